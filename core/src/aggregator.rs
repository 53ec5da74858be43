//! Daily aggregation: a strict left-to-right fold over the window.

use crate::calendar::DateWindow;
use crate::dataset::DailyRecord;
use crate::transaction::{FlowType, Transaction};
use crate::types::Money;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub struct DailyAggregator;

impl DailyAggregator {
    /// One record per calendar day in `window`, ascending and gap-free.
    /// Transactions are bucketed by settlement date; anything dated
    /// outside the window is ignored.
    pub fn aggregate(
        transactions: &[Transaction],
        window: DateWindow,
        starting_balance: Money,
    ) -> Vec<DailyRecord> {
        let mut by_date: BTreeMap<NaiveDate, Vec<Transaction>> = BTreeMap::new();
        for txn in transactions.iter().filter(|t| window.contains(t.date)) {
            by_date.entry(txn.date).or_default().push(txn.clone());
        }

        let mut balance = starting_balance;
        let mut records = Vec::with_capacity(window.len_days() as usize);
        for date in window.days() {
            let day_txns = by_date.remove(&date).unwrap_or_default();
            let (inflows, outflows) = day_txns.iter().fold((0.0, 0.0), |(i, o), t| match t.kind {
                FlowType::Inflow => (i + t.amount, o),
                FlowType::Outflow => (i, o + t.amount),
            });
            balance += inflows - outflows;
            records.push(DailyRecord {
                date,
                inflows,
                outflows,
                balance,
                transactions: day_txns,
            });
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn txn(date: NaiveDate, kind: FlowType, amount: f64) -> Transaction {
        let mut rng = ScriptedRng::constant(0.5);
        Transaction::new(&mut rng, date, kind, "Test", amount, "Acme")
    }

    #[test]
    fn empty_days_still_get_records() {
        let window = DateWindow::new(d(2024, 1, 1), d(2024, 1, 10)).unwrap();
        let records = DailyAggregator::aggregate(&[], window, 1_000.0);
        assert_eq!(records.len(), 10);
        assert!(records.iter().all(|r| r.inflows == 0.0 && r.outflows == 0.0));
        assert!(records.iter().all(|r| r.balance == 1_000.0));
    }

    #[test]
    fn balance_carries_forward() {
        let window = DateWindow::new(d(2024, 1, 1), d(2024, 1, 3)).unwrap();
        let txns = vec![
            txn(d(2024, 1, 1), FlowType::Inflow, 500.0),
            txn(d(2024, 1, 1), FlowType::Outflow, 200.0),
            txn(d(2024, 1, 3), FlowType::Outflow, 1_000.0),
        ];
        let records = DailyAggregator::aggregate(&txns, window, 1_000.0);
        let balances: Vec<f64> = records.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![1_300.0, 1_300.0, 300.0]);
        assert_eq!(records[0].transactions.len(), 2);
        assert_eq!(records[0].opening_balance(), 1_000.0);
    }

    #[test]
    fn out_of_window_transactions_are_not_bucketed() {
        let window = DateWindow::new(d(2024, 1, 1), d(2024, 1, 2)).unwrap();
        let txns = vec![
            txn(d(2023, 12, 31), FlowType::Inflow, 500.0),
            txn(d(2024, 1, 3), FlowType::Inflow, 500.0),
        ];
        let records = DailyAggregator::aggregate(&txns, window, 0.0);
        assert!(records.iter().all(|r| r.transactions.is_empty()));
        assert_eq!(records.last().unwrap().balance, 0.0);
    }

    #[test]
    fn dates_are_strictly_ascending() {
        let window = DateWindow::new(d(2024, 2, 25), d(2024, 3, 5)).unwrap();
        let records = DailyAggregator::aggregate(&[], window, 0.0);
        for pair in records.windows(2) {
            assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
        }
    }
}
