//! The dataset engine: wires generators into historical and forecast runs.
//!
//! HISTORICAL STAGE ORDER (fixed, never reordered):
//!   1. Partners        roster for the run
//!   2. Recurring       calendar-anchored costs
//!   3. CustomerFlows   daily revenue split across customers
//!   4. PaymentTerms    shift inflows to their settlement date
//!   5. OpeningBalance  starting cash
//!   6. Kpi             DSO / DPO fallbacks
//!
//! RULES:
//!   - Every stage draws from its own RngBank slot.
//!   - Aggregation only ever sees the fully projected stream.
//!   - Lookups degrade to defaults; only caller-supplied windows and
//!     horizons can fail.

use crate::{
    aggregator::DailyAggregator,
    calendar::DateWindow,
    config::{IndustryCatalog, IndustryProfile},
    customer_generator::CustomerTransactionGenerator,
    dataset::{ForecastDataset, HistoricalDataset, HistoricalKpis},
    error::SimResult,
    forecast::{ForecastProjector, KPI_MAX_DAYS},
    partner_generator::{BusinessPartnerGenerator, BusinessPartners},
    payment_terms::PaymentTermsProjector,
    recurring_generator::RecurringTransactionGenerator,
    rng::{RandomSource, RngBank, StageSlot},
    source::{run_sources, GenerationContext, SlottedSource},
    transaction::{round_cents, Transaction},
};

/// History length used by the entry points.
pub const DEFAULT_HISTORY_DAYS: u32 = 180;
/// Opening cash varies by up to this fraction around the profile value.
pub const OPENING_BALANCE_JITTER: f64 = 0.10;
/// DSO fallback jitter when nothing settled through payment terms.
pub const DSO_FALLBACK_JITTER: f64 = 0.10;

pub struct DatasetEngine {
    catalog: IndustryCatalog,
    bank:    RngBank,
}

impl DatasetEngine {
    pub fn new(catalog: IndustryCatalog, bank: RngBank) -> Self {
        Self { catalog, bank }
    }

    /// Built-in catalog with a fixed master seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(IndustryCatalog::builtin(), RngBank::new(seed))
    }

    pub fn master_seed(&self) -> u64 {
        self.bank.master_seed()
    }

    /// Generate a settled history over `window` for `industry`.
    /// Unknown industries resolve to manufacturing.
    pub fn historical(&self, industry: &str, window: DateWindow) -> HistoricalDataset {
        let profile = self.catalog.profile(industry);
        let partners =
            BusinessPartnerGenerator::generate(profile, &mut self.bank.for_stage(StageSlot::Partners));

        let ctx = GenerationContext {
            profile,
            partners: &partners,
            window,
        };
        let mut sources: Vec<SlottedSource> = Vec::with_capacity(2);
        sources.push((StageSlot::Recurring, Box::new(RecurringTransactionGenerator::new())));
        sources.push((StageSlot::CustomerFlows, Box::new(CustomerTransactionGenerator::new())));
        let generated = run_sources(&mut sources, &ctx, &self.bank);

        let projected =
            PaymentTermsProjector::project(generated, &mut self.bank.for_stage(StageSlot::PaymentTerms));
        let (mut transactions, receivables) = PaymentTermsProjector::split_settled(projected, window.end);
        transactions.sort_by_key(|t| t.date);

        let starting_balance = opening_balance(profile, &mut self.bank.for_stage(StageSlot::OpeningBalance));
        let daily_data = DailyAggregator::aggregate(&transactions, window, starting_balance);
        let ending_balance = daily_data.last().map_or(starting_balance, |d| d.balance);
        let kpis = historical_kpis(
            profile,
            &transactions,
            &partners,
            &mut self.bank.for_stage(StageSlot::Kpi),
        );

        log::info!(
            "historical {}: {}..{} {} txns ({} receivable), balance {:.2} -> {:.2}, dso={} dpo={} ccc={}",
            profile.key,
            window.start,
            window.end,
            transactions.len(),
            receivables.len(),
            starting_balance,
            ending_balance,
            kpis.dso,
            kpis.dpo,
            kpis.cash_conversion_cycle
        );

        HistoricalDataset {
            daily_data,
            transactions,
            receivables,
            business_partners: partners,
            start_date: window.start,
            end_date: window.end,
            starting_balance,
            ending_balance,
            industry: profile.key,
            kpis,
        }
    }

    /// Project `horizon` days past the end of `historical`.
    pub fn forecast(&self, historical: &HistoricalDataset, horizon: u32) -> SimResult<ForecastDataset> {
        let profile = self.catalog.get(historical.industry);
        let forecast = ForecastProjector::new(horizon).project(profile, historical, &self.bank)?;
        log::info!(
            "forecast {}: {}..{} balance {:.2} -> {:.2}, {} months, burn={} growth={}%",
            profile.key,
            forecast.start_date,
            forecast.end_date,
            forecast.starting_balance,
            forecast.ending_balance(),
            forecast.monthly_forecasts.len(),
            forecast.kpis.burn_rate,
            forecast.kpis.revenue_growth
        );
        Ok(forecast)
    }
}

fn opening_balance(profile: &IndustryProfile, rng: &mut dyn RandomSource) -> f64 {
    round_cents(profile.starting_balance * rng.jitter(OPENING_BALANCE_JITTER))
}

/// DSO, DPO and cash conversion cycle for a settled history.
///
/// DSO is the amount-weighted collection delay of inflows that went
/// through payment terms. DPO is the share-weighted vendor terms.
pub fn historical_kpis(
    profile: &IndustryProfile,
    settled: &[Transaction],
    partners: &BusinessPartners,
    rng: &mut dyn RandomSource,
) -> HistoricalKpis {
    let (weighted_days, collected) = settled
        .iter()
        .filter(|t| t.is_inflow())
        .filter_map(|t| t.invoice_date.map(|inv| ((t.date - inv).num_days() as f64, t.amount)))
        .fold((0.0, 0.0), |(days, total), (delay, amount)| (days + delay * amount, total + amount));

    let dso = if collected > 0.0 {
        weighted_days / collected
    } else {
        profile.average_dso * rng.jitter(DSO_FALLBACK_JITTER)
    };

    let share_total: f64 = partners.vendors.iter().map(|v| v.share).sum();
    let dpo = if share_total > 0.0 {
        partners
            .vendors
            .iter()
            .map(|v| v.share * f64::from(v.payment_terms))
            .sum::<f64>()
            / share_total
    } else {
        profile.average_dpo
    };

    let dso = dso.round().clamp(0.0, KPI_MAX_DAYS);
    let dpo = dpo.round().clamp(0.0, KPI_MAX_DAYS);
    HistoricalKpis {
        dso,
        dpo,
        cash_conversion_cycle: dso + profile.average_dio - dpo,
    }
}

/// The `DEFAULT_HISTORY_DAYS` window ending today.
pub fn default_history_window() -> SimResult<DateWindow> {
    DateWindow::ending(chrono::Local::now().date_naive(), DEFAULT_HISTORY_DAYS)
}

/// Unseeded history for `industry` over the default window.
pub fn generate_historical_data(industry: &str) -> SimResult<HistoricalDataset> {
    let window = default_history_window()?;
    Ok(DatasetEngine::new(IndustryCatalog::builtin(), RngBank::from_entropy()).historical(industry, window))
}

/// Unseeded forecast of `forecast_length` days following `historical`.
pub fn generate_forecast_data(
    historical: &HistoricalDataset,
    forecast_length: u32,
) -> SimResult<ForecastDataset> {
    DatasetEngine::new(IndustryCatalog::builtin(), RngBank::from_entropy()).forecast(historical, forecast_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndustryKey;
    use crate::partner_generator::{Vendor, VendorImportance};
    use crate::rng::ScriptedRng;
    use crate::transaction::FlowType;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn vendor(share: f64, terms: u32) -> Vendor {
        Vendor {
            id: "vend-001".into(),
            name: "Steelco".into(),
            importance: VendorImportance::Standard,
            share,
            payment_terms: terms,
            category: "Raw Materials".into(),
        }
    }

    #[test]
    fn dso_is_amount_weighted_collection_delay() {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.get(IndustryKey::Manufacturing);
        let mut rng = ScriptedRng::constant(0.5);
        let mut a = Transaction::new(&mut rng, d(2024, 2, 1), FlowType::Inflow, "Sales", 3_000.0, "A");
        a.invoice_date = Some(d(2024, 1, 2));
        let mut b = Transaction::new(&mut rng, d(2024, 2, 1), FlowType::Inflow, "Sales", 1_000.0, "B");
        b.invoice_date = Some(d(2024, 1, 22));
        let partners = BusinessPartners {
            customers: Vec::new(),
            vendors: vec![vendor(0.75, 30), vendor(0.25, 90)],
        };
        let kpis = historical_kpis(profile, &[a, b], &partners, &mut rng);
        // (30 * 3000 + 10 * 1000) / 4000 = 25
        assert_eq!(kpis.dso, 25.0);
        assert_eq!(kpis.dpo, 45.0);
        assert_eq!(kpis.cash_conversion_cycle, 25.0 + profile.average_dio - 45.0);
    }

    #[test]
    fn kpis_fall_back_to_profile() {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.get(IndustryKey::Saas);
        let mut rng = ScriptedRng::constant(0.5);
        let kpis = historical_kpis(profile, &[], &BusinessPartners::default(), &mut rng);
        assert_eq!(kpis.dso, profile.average_dso);
        assert_eq!(kpis.dpo, profile.average_dpo);
    }

    #[test]
    fn kpis_are_clamped() {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.get(IndustryKey::Retail);
        let mut rng = ScriptedRng::constant(0.5);
        let partners = BusinessPartners {
            customers: Vec::new(),
            vendors: vec![vendor(1.0, 365)],
        };
        let kpis = historical_kpis(profile, &[], &partners, &mut rng);
        assert_eq!(kpis.dpo, KPI_MAX_DAYS);
    }

    #[test]
    fn historical_window_and_industry_round_trip() {
        let engine = DatasetEngine::seeded(42);
        let window = DateWindow::new(d(2024, 1, 1), d(2024, 3, 31)).unwrap();
        let hist = engine.historical("saas", window);
        assert_eq!(hist.industry, IndustryKey::Saas);
        assert_eq!(hist.daily_data.len(), 91);
        assert_eq!(hist.start_date, window.start);
        assert_eq!(hist.end_date, window.end);
        assert!(hist.receivables.iter().all(|t| t.date > window.end));
        assert!(hist.transactions.iter().all(|t| window.contains(t.date)));
    }

    #[test]
    fn opening_balance_within_band() {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.get(IndustryKey::Retail);
        for roll in [0.0, 0.5, 0.999] {
            let balance = opening_balance(profile, &mut ScriptedRng::constant(roll));
            assert!(balance >= profile.starting_balance * 0.9 - 0.01);
            assert!(balance <= profile.starting_balance * 1.1 + 0.01);
        }
    }
}
