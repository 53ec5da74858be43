//! Synthetic cash-flow datasets: seasonal transaction streams, rolling
//! balances and decaying-confidence forecasts for a small business.
//!
//! Entry points live in [`engine`]; read-only views in [`query`].

pub mod aggregator;
pub mod calendar;
pub mod config;
pub mod customer_generator;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod name_generator;
pub mod partner_generator;
pub mod payment_terms;
pub mod query;
pub mod recurring_generator;
pub mod rng;
pub mod source;
pub mod transaction;
pub mod types;
pub mod weighted;

pub use calendar::DateWindow;
pub use config::{IndustryCatalog, IndustryKey, IndustryProfile};
pub use dataset::{DailyRecord, ForecastDataset, ForecastDay, HistoricalDataset, MonthlySummary};
pub use engine::{generate_forecast_data, generate_historical_data, DatasetEngine};
pub use error::{SimError, SimResult};
pub use query::{get_category_breakdown, get_top_entities, get_transaction_details, EntityType};
pub use rng::{RandomSource, RngBank};
pub use transaction::{FlowType, Transaction};
