//! Dataset values handed to the presentation layer.
//!
//! Both datasets are built in one generation call and never mutated
//! afterwards by this crate.

use crate::config::IndustryKey;
use crate::partner_generator::BusinessPartners;
use crate::transaction::Transaction;
use crate::types::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub inflows: Money,
    pub outflows: Money,
    /// Closing balance for the day.
    pub balance: Money,
    pub transactions: Vec<Transaction>,
}

impl DailyRecord {
    pub fn net_flow(&self) -> Money {
        self.inflows - self.outflows
    }

    pub fn opening_balance(&self) -> Money {
        self.balance - self.net_flow()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    #[serde(flatten)]
    pub record: DailyRecord,
    /// Heuristic certainty in percent, 50..=95.
    pub confidence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// `yyyy-mm`.
    pub month: String,
    pub inflows: Money,
    pub outflows: Money,
    /// Closing balance of the last day rolled into this month.
    pub balance: Money,
    pub confidence: u32,
    pub days: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalKpis {
    pub dso: f64,
    pub dpo: f64,
    pub cash_conversion_cycle: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastKpis {
    pub dso: f64,
    pub dpo: f64,
    pub burn_rate: f64,
    pub cash_conversion_cycle: f64,
    /// Percent change of mean daily inflow against the history.
    pub revenue_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalDataset {
    pub daily_data: Vec<DailyRecord>,
    /// Every transaction settled inside the window.
    pub transactions: Vec<Transaction>,
    /// Invoiced inside the window but settling after `end_date`.
    #[serde(default)]
    pub receivables: Vec<Transaction>,
    pub business_partners: BusinessPartners,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_balance: Money,
    pub ending_balance: Money,
    pub industry: IndustryKey,
    pub kpis: HistoricalKpis,
}

impl HistoricalDataset {
    pub fn total_inflows(&self) -> Money {
        self.daily_data.iter().map(|d| d.inflows).sum()
    }

    pub fn mean_daily_inflow(&self) -> Money {
        if self.daily_data.is_empty() {
            return 0.0;
        }
        self.total_inflows() / self.daily_data.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDataset {
    pub daily_forecasts: Vec<ForecastDay>,
    pub monthly_forecasts: Vec<MonthlySummary>,
    pub transactions: Vec<Transaction>,
    pub business_partners: BusinessPartners,
    pub kpis: ForecastKpis,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_balance: Money,
    pub industry: IndustryKey,
}

impl ForecastDataset {
    pub fn ending_balance(&self) -> Money {
        self.daily_forecasts
            .last()
            .map_or(self.starting_balance, |d| d.record.balance)
    }
}
