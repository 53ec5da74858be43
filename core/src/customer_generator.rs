//! Customer-driven revenue: seasonality, weekday rhythm and special
//! events set a daily total, which is split across a handful of
//! customer transactions.

use crate::calendar::weekday_index;
use crate::config::{IndustryKey, IndustryProfile};
use crate::rng::RandomSource;
use crate::source::{GenerationContext, TransactionSource};
use crate::transaction::{FlowType, SettlementTerms, Transaction};
use crate::weighted::pick_weighted;
use chrono::{Datelike, NaiveDate};

/// Parts below this amount are dropped.
pub const MIN_TRANSACTION_AMOUNT: f64 = 100.0;
/// Days whose total is at or below this share of the base are skipped.
pub const LOW_ACTIVITY_SHARE: f64 = 0.1;
/// Chance of routing an event-day sale to a small-tier customer.
pub const EVENT_SMALL_CUSTOMER_CHANCE: f64 = 0.5;
/// Counterparty for sales with no roster customer.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// Widens the variability bound the further a day is from `start`.
/// Forecasts use this so far-out days are noisier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarianceSchedule {
    pub start: NaiveDate,
    pub horizon: u32,
    pub growth: f64,
}

impl VarianceSchedule {
    pub fn factor(&self, date: NaiveDate) -> f64 {
        let elapsed = (date - self.start).num_days().max(0) as f64;
        1.0 + (elapsed / f64::from(self.horizon.max(1))) * self.growth
    }
}

#[derive(Debug, Default)]
pub struct CustomerTransactionGenerator {
    variance: Option<VarianceSchedule>,
}

impl CustomerTransactionGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variance(variance: VarianceSchedule) -> Self {
        Self {
            variance: Some(variance),
        }
    }

    /// The day's total before it is split, or `None` for a dead day.
    fn daily_total(&self, date: NaiveDate, profile: &IndustryProfile, rng: &mut dyn RandomSource) -> Option<f64> {
        let base = profile.base_daily_inflow;
        let event_factor = profile
            .event_on(date.month(), date.day())
            .map_or(1.0, |e| e.inflow_factor);
        let variability =
            profile.daily_variability * self.variance.map_or(1.0, |v| v.factor(date));

        let total = base
            * profile.inflow_factor(date.month0() as usize)
            * profile.weekday_factor(weekday_index(date))
            * event_factor
            * rng.jitter(variability);

        (total > LOW_ACTIVITY_SHARE * base).then_some(total)
    }
}

/// How many parts a day splits into, inclusive.
fn split_count(key: IndustryKey) -> (u32, u32) {
    match key {
        IndustryKey::Retail => (4, 7),
        IndustryKey::Manufacturing => (2, 3),
        IndustryKey::Saas => (3, 4),
    }
}

/// Share of the remainder each non-final part takes.
fn split_share(key: IndustryKey) -> (f64, f64) {
    match key {
        IndustryKey::Retail => (0.1, 0.5),
        _ => (0.2, 0.8),
    }
}

impl TransactionSource for CustomerTransactionGenerator {
    fn name(&self) -> &'static str {
        "customer_flows"
    }

    fn generate_day(
        &mut self,
        date: NaiveDate,
        ctx: &GenerationContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Vec<Transaction> {
        let profile = ctx.profile;
        let Some(total) = self.daily_total(date, profile, rng) else {
            return Vec::new();
        };
        let event = profile.event_on(date.month(), date.day());

        let (min_parts, max_parts) = split_count(profile.key);
        let (share_lo, share_hi) = split_share(profile.key);
        let parts = rng.int_inclusive(min_parts, max_parts);

        let mut out = Vec::with_capacity(parts as usize);
        let mut remaining = total;
        for i in 0..parts {
            let amount = if i + 1 == parts {
                remaining
            } else {
                let part = remaining * rng.uniform(share_lo, share_hi);
                remaining -= part;
                part
            };
            if amount < MIN_TRANSACTION_AMOUNT {
                continue;
            }

            let customer = if event.is_some() && rng.chance(EVENT_SMALL_CUSTOMER_CHANCE) {
                ctx.partners.pick_small_customer(rng)
            } else {
                ctx.partners.pick_customer(rng)
            };

            let (category, weight) = pick_weighted(&profile.transaction_categories.inflows, |c| c.weight, rng)
                .map_or(("Sales", 1.0), |c| (c.name.as_str(), c.weight));

            let kind = if weight < 0.0 {
                FlowType::Outflow
            } else {
                FlowType::Inflow
            };
            let entity = customer.map_or(WALK_IN_CUSTOMER, |c| c.name.as_str());

            let mut txn = Transaction::new(rng, date, kind, category, amount, entity);
            txn.entity_id = customer.map(|c| c.id.clone());
            txn.entity_tier = customer.map(|c| c.tier);
            txn.event = event.map(|e| e.name.clone());
            txn.notes = match (kind, event) {
                (FlowType::Outflow, _) => format!("Refund issued to {entity}"),
                (FlowType::Inflow, Some(e)) => format!("{} sales", e.name),
                (FlowType::Inflow, None) => "Customer payment".to_string(),
            };
            if kind == FlowType::Inflow {
                txn.settlement = customer.map(|c| SettlementTerms {
                    payment_terms: c.payment_terms,
                    reliability: c.payment_reliability,
                });
            }
            out.push(txn);
        }
        out
    }
}
