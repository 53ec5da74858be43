//! Settlement-date projection.
//!
//! A customer inflow is generated on its invoice date; cash arrives
//! `payment_terms` days later, nudged by the customer's reliability.
//! Runs as one pass over the full stream before aggregation, since
//! aggregation buckets strictly by settlement date.

use crate::calendar::add_days;
use crate::partner_generator::PaymentReliability;
use crate::rng::RandomSource;
use crate::transaction::{SettlementTerms, Transaction};
use chrono::NaiveDate;

/// Early payers shave this many days off their terms (uniform draw).
pub const EARLY_DAYS: (f64, f64) = (5.0, 10.0);
/// Late payers add this many days (uniform draw).
pub const LATE_DAYS: (f64, f64) = (5.0, 15.0);

/// Days from invoice to cash for one set of terms.
pub fn settlement_delay(terms: &SettlementTerms, rng: &mut dyn RandomSource) -> u32 {
    let delay = f64::from(terms.payment_terms);
    let adjusted = match terms.reliability {
        PaymentReliability::Early => (delay - rng.uniform(EARLY_DAYS.0, EARLY_DAYS.1)).max(0.0),
        PaymentReliability::Late => delay + rng.uniform(LATE_DAYS.0, LATE_DAYS.1),
        PaymentReliability::OnTime => delay,
    };
    adjusted.round() as u32
}

pub struct PaymentTermsProjector;

impl PaymentTermsProjector {
    /// Shift every inflow that carries settlement terms. Everything else
    /// passes through untouched. Order is preserved.
    pub fn project(transactions: Vec<Transaction>, rng: &mut dyn RandomSource) -> Vec<Transaction> {
        let mut shifted = 0usize;
        let projected: Vec<Transaction> = transactions
            .into_iter()
            .map(|mut txn| {
                if !txn.is_inflow() || txn.invoice_date.is_some() {
                    return txn;
                }
                if let Some(terms) = txn.settlement {
                    let delay = settlement_delay(&terms, rng);
                    txn.invoice_date = Some(txn.date);
                    txn.date = add_days(txn.date, delay);
                    shifted += 1;
                }
                txn
            })
            .collect();
        log::debug!("payment terms: shifted {shifted} of {} txns", projected.len());
        projected
    }

    /// Split a projected stream at `last_day`: the first half settles on
    /// or before it, the second is still outstanding.
    pub fn split_settled(
        transactions: Vec<Transaction>,
        last_day: NaiveDate,
    ) -> (Vec<Transaction>, Vec<Transaction>) {
        transactions.into_iter().partition(|t| t.date <= last_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;
    use crate::transaction::FlowType;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn invoice(reliability: PaymentReliability, terms: u32) -> Transaction {
        let mut rng = ScriptedRng::constant(0.3);
        let mut txn = Transaction::new(&mut rng, d(2024, 3, 1), FlowType::Inflow, "Product Sales", 5_000.0, "Acme");
        txn.settlement = Some(SettlementTerms {
            payment_terms: terms,
            reliability,
        });
        txn
    }

    #[test]
    fn on_time_settles_exactly_on_terms() {
        let mut rng = ScriptedRng::constant(0.9);
        let out = PaymentTermsProjector::project(vec![invoice(PaymentReliability::OnTime, 30)], &mut rng);
        assert_eq!(out[0].invoice_date, Some(d(2024, 3, 1)));
        assert_eq!(out[0].date, d(2024, 3, 31));
    }

    #[test]
    fn late_adds_five_to_fifteen_days() {
        let mut low = ScriptedRng::constant(0.0);
        let mut high = ScriptedRng::constant(0.999);
        let a = PaymentTermsProjector::project(vec![invoice(PaymentReliability::Late, 30)], &mut low);
        let b = PaymentTermsProjector::project(vec![invoice(PaymentReliability::Late, 30)], &mut high);
        assert_eq!((a[0].date - d(2024, 3, 1)).num_days(), 35);
        assert_eq!((b[0].date - d(2024, 3, 1)).num_days(), 45);
    }

    #[test]
    fn early_never_settles_before_invoice() {
        let mut rng = ScriptedRng::constant(0.999);
        let out = PaymentTermsProjector::project(vec![invoice(PaymentReliability::Early, 7)], &mut rng);
        assert_eq!(out[0].date, d(2024, 3, 1));

        let mut rng = ScriptedRng::constant(0.0);
        let out = PaymentTermsProjector::project(vec![invoice(PaymentReliability::Early, 30)], &mut rng);
        assert_eq!(out[0].date, d(2024, 3, 26));
    }

    #[test]
    fn outflows_and_untermed_inflows_pass_through() {
        let mut rng = ScriptedRng::constant(0.5);
        let outflow = Transaction::new(&mut rng, d(2024, 3, 1), FlowType::Outflow, "Rent", 900.0, "Landlord");
        let walk_in = Transaction::new(&mut rng, d(2024, 3, 1), FlowType::Inflow, "Sales", 900.0, "Walk-in Customer");
        let out = PaymentTermsProjector::project(vec![outflow.clone(), walk_in.clone()], &mut rng);
        assert_eq!(out, vec![outflow, walk_in]);
    }

    #[test]
    fn projection_is_idempotent() {
        let mut rng = ScriptedRng::constant(0.5);
        let once = PaymentTermsProjector::project(vec![invoice(PaymentReliability::OnTime, 15)], &mut rng);
        let twice = PaymentTermsProjector::project(once.clone(), &mut rng);
        assert_eq!(once, twice);
    }

    #[test]
    fn split_settled_partitions_on_last_day() {
        let mut rng = ScriptedRng::constant(0.5);
        let txns = PaymentTermsProjector::project(
            vec![invoice(PaymentReliability::OnTime, 10), invoice(PaymentReliability::OnTime, 60)],
            &mut rng,
        );
        let (settled, open) = PaymentTermsProjector::split_settled(txns, d(2024, 3, 31));
        assert_eq!(settled.len(), 1);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].date, d(2024, 4, 30));
    }
}
