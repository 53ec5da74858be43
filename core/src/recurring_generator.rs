//! Calendar-anchored outflows: payroll, rent, utilities, insurance,
//! subscriptions and the industry-specific cost runs.
//!
//! Each predicate is checked independently every day; a day may emit
//! several transactions when several predicates match.

use crate::calendar::{
    is_last_day_of_month, is_quarter_start_month, is_tuesday, months_between, next_month_index,
};
use crate::config::{IndustryKey, IndustryProfile};
use crate::rng::RandomSource;
use crate::source::{GenerationContext, TransactionSource};
use crate::transaction::{FlowType, Transaction};
use chrono::{Datelike, NaiveDate};

/// Marketing spend is pushed up ahead of a strong month.
pub const MARKETING_BOOST: f64 = 1.5;
pub const MARKETING_BOOST_THRESHOLD: f64 = 1.2;
/// Monthly compounding of cloud spend as usage grows.
pub const CLOUD_GROWTH_PER_MONTH: f64 = 0.01;

/// One recurring cost line.
struct Charge {
    category: &'static str,
    fallback_entity: &'static str,
    base: f64,
    jitter: f64,
    notes: &'static str,
}

#[derive(Debug, Default)]
pub struct RecurringTransactionGenerator;

impl RecurringTransactionGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Every charge due on `date`, before amounts are drawn.
    fn charges_due(&self, date: NaiveDate, ctx: &GenerationContext<'_>) -> Vec<Charge> {
        let profile = ctx.profile;
        let costs = &profile.cost_base;
        let day = date.day();
        let month0 = date.month0() as usize;
        let mut due = Vec::new();

        if day == 15 || is_last_day_of_month(date) {
            due.push(Charge {
                category: "Payroll",
                fallback_entity: "Payroll",
                base: costs.payroll,
                jitter: 0.10,
                notes: "Semi-monthly payroll run",
            });
        }
        if day == 1 {
            due.push(Charge {
                category: "Rent",
                fallback_entity: "Landlord",
                base: costs.rent,
                jitter: 0.10,
                notes: "Monthly rent",
            });
        }
        if day == 10 {
            due.push(Charge {
                category: "Utilities",
                fallback_entity: "Utility Company",
                base: costs.utilities * profile.outflow_factor(month0),
                jitter: 0.20,
                notes: "Monthly utilities",
            });
        }
        if day == 5 && matches!(profile.key, IndustryKey::Saas | IndustryKey::Retail) {
            due.push(Charge {
                category: "Software",
                fallback_entity: "Software Subscriptions",
                base: costs.software,
                jitter: 0.10,
                notes: "Software subscriptions",
            });
        }
        if day == 15 && is_quarter_start_month(date) {
            due.push(Charge {
                category: "Insurance",
                fallback_entity: "Insurance Provider",
                base: costs.insurance,
                jitter: 0.10,
                notes: "Quarterly insurance premium",
            });
        }

        match profile.key {
            IndustryKey::Saas if day == 3 => {
                let months = months_between(ctx.window.start, date).max(0);
                due.push(Charge {
                    category: "Cloud Infrastructure",
                    fallback_entity: "Cloud Provider",
                    base: costs.cloud_infrastructure
                        * (1.0 + CLOUD_GROWTH_PER_MONTH * f64::from(months)),
                    jitter: 0.15,
                    notes: "Cloud hosting and compute",
                });
            }
            IndustryKey::Manufacturing if day == 5 || day == 20 => {
                due.push(Charge {
                    category: "Raw Materials",
                    fallback_entity: "Materials Supplier",
                    base: costs.raw_materials * variable_cost_factor(profile, date),
                    jitter: 0.20,
                    notes: "Raw materials purchase",
                });
            }
            IndustryKey::Retail if is_tuesday(date) => {
                due.push(Charge {
                    category: "Inventory",
                    fallback_entity: "Wholesale Supplier",
                    base: costs.inventory * variable_cost_factor(profile, date),
                    jitter: 0.20,
                    notes: "Weekly inventory restock",
                });
            }
            _ => {}
        }

        if day == 20 {
            let boost = if profile.inflow_factor(next_month_index(date)) > MARKETING_BOOST_THRESHOLD {
                MARKETING_BOOST
            } else {
                1.0
            };
            due.push(Charge {
                category: "Marketing",
                fallback_entity: "Marketing Agency",
                base: costs.marketing * boost,
                jitter: 0.20,
                notes: if boost > 1.0 {
                    "Marketing push ahead of peak season"
                } else {
                    "Monthly marketing spend"
                },
            });
        }

        due
    }
}

/// Month seasonality times any outflow event factor for the day.
fn variable_cost_factor(profile: &IndustryProfile, date: NaiveDate) -> f64 {
    let event = profile
        .event_on(date.month(), date.day())
        .map_or(1.0, |e| e.outflow_factor);
    profile.outflow_factor(date.month0() as usize) * event
}

impl TransactionSource for RecurringTransactionGenerator {
    fn name(&self) -> &'static str {
        "recurring"
    }

    fn generate_day(
        &mut self,
        date: NaiveDate,
        ctx: &GenerationContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Vec<Transaction> {
        let mut out = Vec::new();
        for charge in self.charges_due(date, ctx) {
            if charge.base <= 0.0 {
                continue;
            }
            let amount = charge.base * rng.jitter(charge.jitter);
            let vendor = ctx.partners.pick_vendor_for(charge.category, rng);
            let entity = vendor.map_or(charge.fallback_entity, |v| v.name.as_str());

            let mut txn = Transaction::new(rng, date, FlowType::Outflow, charge.category, amount, entity);
            txn.entity_id = vendor.map(|v| v.id.clone());
            txn.is_recurring = true;
            txn.notes = charge.notes.to_string();
            out.push(txn);
        }
        out
    }
}
