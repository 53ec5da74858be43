//! Forward projection from a finished historical dataset.
//!
//! The forecast window opens the day after the history ends and carries
//! its balance forward. Customer flows get noisier and confidence decays
//! the further out a day sits.

use crate::aggregator::DailyAggregator;
use crate::calendar::{add_days, month_key, DateWindow};
use crate::config::IndustryProfile;
use crate::customer_generator::{CustomerTransactionGenerator, VarianceSchedule};
use crate::dataset::{
    DailyRecord, ForecastDataset, ForecastDay, ForecastKpis, HistoricalDataset, MonthlySummary,
};
use crate::error::SimResult;
use crate::partner_generator::{BusinessPartnerGenerator, BusinessPartners};
use crate::payment_terms::PaymentTermsProjector;
use crate::recurring_generator::RecurringTransactionGenerator;
use crate::rng::{RandomSource, RngBank, StageSlot};
use crate::source::{run_sources, GenerationContext, SlottedSource};
use crate::transaction::Transaction;
use crate::types::DayOffset;
use chrono::Datelike;

pub const DEFAULT_HORIZON: u32 = 90;
pub const CONFIDENCE_START: f64 = 95.0;
pub const CONFIDENCE_FLOOR: f64 = 50.0;
/// Variability is widened by up to this fraction at the horizon.
pub const VARIANCE_GROWTH: f64 = 0.8;
/// Days of jitter on a profile DSO/DPO when the history has none.
pub const KPI_JITTER_DAYS: f64 = 5.0;
pub const KPI_MAX_DAYS: f64 = 120.0;

/// Heuristic certainty for day `d` (0-based) of a `horizon`-day forecast.
pub fn confidence_for(d: DayOffset, horizon: u32) -> u32 {
    let progress = f64::from(d) / f64::from(horizon.max(1));
    let confidence = (CONFIDENCE_START - progress * (CONFIDENCE_START - CONFIDENCE_FLOOR)).round();
    confidence.clamp(CONFIDENCE_FLOOR, CONFIDENCE_START) as u32
}

/// Running state while folding days into a month.
struct MonthAcc {
    month: String,
    inflows: f64,
    outflows: f64,
    balance: f64,
    confidence_sum: u64,
    days: u32,
}

impl MonthAcc {
    fn open(day: &ForecastDay) -> Self {
        let mut acc = Self {
            month: month_key(day.record.date),
            inflows: 0.0,
            outflows: 0.0,
            balance: day.record.balance,
            confidence_sum: 0,
            days: 0,
        };
        acc.push(day);
        acc
    }

    fn push(&mut self, day: &ForecastDay) {
        self.inflows += day.record.inflows;
        self.outflows += day.record.outflows;
        self.balance = day.record.balance;
        self.confidence_sum += u64::from(day.confidence);
        self.days += 1;
    }

    fn close(self) -> MonthlySummary {
        let confidence = (self.confidence_sum as f64 / f64::from(self.days.max(1))).round() as u32;
        MonthlySummary {
            month: self.month,
            inflows: self.inflows,
            outflows: self.outflows,
            balance: self.balance,
            confidence,
            days: self.days,
        }
    }
}

/// The historical roster, with any empty customer or vendor list
/// refilled from a roster drawn on the forecast partner slot.
fn forecast_roster(profile: &IndustryProfile, history: &BusinessPartners, bank: &RngBank) -> BusinessPartners {
    let mut partners = history.clone();
    if !partners.customers.is_empty() && !partners.vendors.is_empty() {
        return partners;
    }

    let fresh = BusinessPartnerGenerator::generate(profile, &mut bank.for_stage(StageSlot::ForecastPartners));
    if partners.customers.is_empty() {
        log::warn!("historical dataset has no customers; regenerating them for forecast");
        partners.customers = fresh.customers;
    }
    if partners.vendors.is_empty() {
        log::warn!("historical dataset has no vendors; regenerating them for forecast");
        partners.vendors = fresh.vendors;
    }
    partners
}

/// Group daily forecasts into calendar months.
///
/// A month opens on the first day-1 record. Days before it are not
/// rolled up. A window with no day 1 at all becomes a single month keyed
/// by its first day.
pub fn monthly_rollup(days: &[ForecastDay]) -> Vec<MonthlySummary> {
    let mut months = Vec::new();
    let mut current: Option<MonthAcc> = None;

    for day in days {
        if day.record.date.day() == 1 {
            if let Some(done) = current.take() {
                months.push(done.close());
            }
            current = Some(MonthAcc::open(day));
        } else if let Some(acc) = current.as_mut() {
            acc.push(day);
        }
    }
    if let Some(done) = current {
        months.push(done.close());
    }

    if months.is_empty() {
        if let Some((first, rest)) = days.split_first() {
            let mut acc = MonthAcc::open(first);
            rest.iter().for_each(|d| acc.push(d));
            months.push(acc.close());
        }
    }
    months
}

pub struct ForecastProjector {
    horizon: u32,
}

impl ForecastProjector {
    pub fn new(horizon: u32) -> Self {
        Self { horizon }
    }

    pub fn project(
        &self,
        profile: &IndustryProfile,
        historical: &HistoricalDataset,
        bank: &RngBank,
    ) -> SimResult<ForecastDataset> {
        let window = DateWindow::starting(add_days(historical.end_date, 1), self.horizon)?;

        let partners = forecast_roster(profile, &historical.business_partners, bank);

        let transactions = self.project_transactions(profile, &partners, historical, window, bank);
        let daily_forecasts: Vec<ForecastDay> =
            DailyAggregator::aggregate(&transactions, window, historical.ending_balance)
                .into_iter()
                .enumerate()
                .map(|(d, record)| ForecastDay {
                    confidence: confidence_for(d as DayOffset, self.horizon),
                    record,
                })
                .collect();
        let monthly_forecasts = monthly_rollup(&daily_forecasts);
        let kpis = forecast_kpis(
            profile,
            historical,
            &daily_forecasts,
            &monthly_forecasts,
            &mut bank.for_stage(StageSlot::ForecastKpi),
        );

        Ok(ForecastDataset {
            daily_forecasts,
            monthly_forecasts,
            transactions,
            business_partners: partners,
            kpis,
            start_date: window.start,
            end_date: window.end,
            starting_balance: historical.ending_balance,
            industry: profile.key,
        })
    }

    /// Recurring costs, fresh customer invoices and carried-in
    /// receivables, keeping only what settles inside `window`.
    fn project_transactions(
        &self,
        profile: &IndustryProfile,
        partners: &BusinessPartners,
        historical: &HistoricalDataset,
        window: DateWindow,
        bank: &RngBank,
    ) -> Vec<Transaction> {
        let ctx = GenerationContext {
            profile,
            partners,
            window,
        };

        let variance = VarianceSchedule {
            start: window.start,
            horizon: self.horizon,
            growth: VARIANCE_GROWTH,
        };
        let mut sources: Vec<SlottedSource> = Vec::with_capacity(2);
        sources.push((StageSlot::ForecastRecurring, Box::new(RecurringTransactionGenerator::new())));
        sources.push((
            StageSlot::ForecastCustomerFlows,
            Box::new(CustomerTransactionGenerator::with_variance(variance)),
        ));
        let generated = run_sources(&mut sources, &ctx, bank);
        let mut stream =
            PaymentTermsProjector::project(generated, &mut bank.for_stage(StageSlot::ForecastPaymentTerms));

        let carried: Vec<Transaction> = historical
            .receivables
            .iter()
            .filter(|t| window.contains(t.date))
            .cloned()
            .collect();
        log::debug!(
            "forecast: carried {} of {} receivables into {}..{}",
            carried.len(),
            historical.receivables.len(),
            window.start,
            window.end
        );

        stream.extend(carried);

        let before = stream.len();
        stream.retain(|t| window.contains(t.date));
        if stream.len() < before {
            log::debug!("forecast: dropped {} txns settling past the horizon", before - stream.len());
        }
        stream.sort_by_key(|t| t.date);
        stream
    }
}

fn mean_daily_inflow(days: &[ForecastDay]) -> f64 {
    if days.is_empty() {
        return 0.0;
    }
    days.iter().map(|d| d.record.inflows).sum::<f64>() / days.len() as f64
}

/// Profile value nudged by up to `KPI_JITTER_DAYS` either way.
fn jittered_days(value: f64, rng: &mut dyn RandomSource) -> f64 {
    (value + rng.uniform(-KPI_JITTER_DAYS, KPI_JITTER_DAYS))
        .round()
        .clamp(0.0, KPI_MAX_DAYS)
}

pub fn forecast_kpis(
    profile: &IndustryProfile,
    historical: &HistoricalDataset,
    days: &[ForecastDay],
    months: &[MonthlySummary],
    rng: &mut dyn RandomSource,
) -> ForecastKpis {
    let inherited = historical.kpis;
    let dso = if inherited.dso > 0.0 {
        inherited.dso
    } else {
        jittered_days(profile.average_dso, rng)
    };
    let dpo = if inherited.dpo > 0.0 {
        inherited.dpo
    } else {
        jittered_days(profile.average_dpo, rng)
    };
    let cash_conversion_cycle = if inherited.cash_conversion_cycle != 0.0 {
        inherited.cash_conversion_cycle
    } else {
        dso + profile.average_dio - dpo
    };

    let burn_rate = months.first().map_or(0.0, |m| (m.outflows / 30.0).round());

    let history_mean = historical.mean_daily_inflow();
    let revenue_growth = if history_mean > 0.0 {
        let pct = (mean_daily_inflow(days) - history_mean) / history_mean * 100.0;
        (pct * 10.0).round() / 10.0
    } else {
        0.0
    };

    ForecastKpis {
        dso,
        dpo,
        burn_rate,
        cash_conversion_cycle,
        revenue_growth,
    }
}
