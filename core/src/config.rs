//! Industry profile catalog.
//!
//! A profile is the static description of how one industry's cash moves:
//! seasonality, weekday rhythm, calendar events, working-capital
//! baselines, category tables and the cost base the recurring schedule
//! draws from. Lookups never fail: an unknown key resolves to
//! manufacturing.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndustryKey {
    Retail,
    #[default]
    Manufacturing,
    Saas,
}

impl IndustryKey {
    pub const ALL: [IndustryKey; 3] = [Self::Retail, Self::Manufacturing, Self::Saas];

    /// Strict lookup. Case-insensitive, surrounding whitespace ignored.
    pub fn lookup(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "retail" => Some(Self::Retail),
            "manufacturing" => Some(Self::Manufacturing),
            "saas" => Some(Self::Saas),
            _ => None,
        }
    }

    /// Lenient lookup used by every public entry point.
    pub fn resolve(key: &str) -> Self {
        Self::lookup(key).unwrap_or_else(|| {
            log::warn!("unknown industry '{key}', falling back to manufacturing");
            Self::default()
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retail => "retail",
            Self::Manufacturing => "manufacturing",
            Self::Saas => "saas",
        }
    }
}

impl fmt::Display for IndustryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialEvent {
    pub month: u32,
    pub day: u32,
    pub inflow_factor: f64,
    pub outflow_factor: f64,
    pub name: String,
}

/// A draw-table entry. Negative weights mark refund-like categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCategories {
    pub inflows: Vec<CategoryWeight>,
    pub outflows: Vec<CategoryWeight>,
}

/// Base amounts for the recurring outflow schedule. A zero entry
/// means the industry has no such cost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostBase {
    /// Per pay run (two runs a month).
    pub payroll: f64,
    pub rent: f64,
    pub utilities: f64,
    pub software: f64,
    /// Per quarterly premium.
    pub insurance: f64,
    pub cloud_infrastructure: f64,
    /// Per purchase run (two a month).
    pub raw_materials: f64,
    /// Per weekly restock.
    pub inventory: f64,
    pub marketing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryProfile {
    pub key: IndustryKey,
    pub label: String,
    pub monthly_inflow_factors: Vec<f64>,
    pub monthly_outflow_factors: Vec<f64>,
    /// Sunday first.
    pub weekday_factors: Vec<f64>,
    pub special_events: Vec<SpecialEvent>,
    pub average_dso: f64,
    pub average_dpo: f64,
    pub average_dio: f64,
    pub daily_variability: f64,
    pub transaction_categories: TransactionCategories,
    pub base_daily_inflow: f64,
    pub starting_balance: f64,
    pub cost_base: CostBase,
    pub customer_payment_terms: Vec<u32>,
    pub vendor_payment_terms: Vec<u32>,
}

impl IndustryProfile {
    pub fn inflow_factor(&self, month0: usize) -> f64 {
        self.monthly_inflow_factors.get(month0).copied().unwrap_or(1.0)
    }

    pub fn outflow_factor(&self, month0: usize) -> f64 {
        self.monthly_outflow_factors.get(month0).copied().unwrap_or(1.0)
    }

    pub fn weekday_factor(&self, weekday: usize) -> f64 {
        self.weekday_factors.get(weekday).copied().unwrap_or(1.0)
    }

    /// Exact (month, day) match against the event calendar.
    pub fn event_on(&self, month: u32, day: u32) -> Option<&SpecialEvent> {
        self.special_events
            .iter()
            .find(|e| e.month == month && e.day == day)
    }

    pub fn outflow_category_names(&self) -> Vec<&str> {
        self.transaction_categories
            .outflows
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    fn validate(&self) -> SimResult<()> {
        let fail = |details: String| SimError::InvalidProfile {
            industry: self.key.to_string(),
            details,
        };
        if self.monthly_inflow_factors.len() != 12 || self.monthly_outflow_factors.len() != 12 {
            return Err(fail("monthly factor tables must have 12 entries".into()));
        }
        if self.weekday_factors.len() != 7 {
            return Err(fail(format!(
                "weekday table must have 7 entries, got {}",
                self.weekday_factors.len()
            )));
        }
        if !(0.0..1.0).contains(&self.daily_variability) {
            return Err(fail(format!(
                "daily variability {} outside [0, 1)",
                self.daily_variability
            )));
        }
        if self.base_daily_inflow <= 0.0 {
            return Err(fail("base daily inflow must be positive".into()));
        }
        if self.transaction_categories.inflows.is_empty()
            || self.transaction_categories.outflows.is_empty()
        {
            return Err(fail("category tables must not be empty".into()));
        }
        for event in &self.special_events {
            if !(1..=12).contains(&event.month) || !(1..=31).contains(&event.day) {
                return Err(fail(format!(
                    "event '{}' has invalid date {}/{}",
                    event.name, event.month, event.day
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileCatalogFile {
    profiles: Vec<IndustryProfile>,
}

/// Every industry profile the generator knows about.
#[derive(Debug, Clone)]
pub struct IndustryCatalog {
    // Populated for every IndustryKey at construction.
    profiles: HashMap<IndustryKey, IndustryProfile>,
}

impl Default for IndustryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IndustryCatalog {
    pub fn builtin() -> Self {
        let profiles = [retail(), manufacturing(), saas()]
            .into_iter()
            .map(|p| (p.key, p))
            .collect();
        Self { profiles }
    }

    /// Built-in profiles overlaid with the ones in a JSON file of the
    /// form `{ "profiles": [ ... ] }`.
    pub fn load(path: &str) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: ProfileCatalogFile = serde_json::from_str(&content)?;
        let mut catalog = Self::builtin();
        for profile in file.profiles {
            profile.validate()?;
            log::info!("profile override loaded for {}", profile.key);
            catalog.profiles.insert(profile.key, profile);
        }
        Ok(catalog)
    }

    pub fn to_json(&self) -> SimResult<String> {
        let profiles = IndustryKey::ALL
            .iter()
            .map(|key| self.get(*key).clone())
            .collect();
        Ok(serde_json::to_string_pretty(&ProfileCatalogFile { profiles })?)
    }

    pub fn get(&self, key: IndustryKey) -> &IndustryProfile {
        &self.profiles[&key]
    }

    /// Lenient string lookup; unknown keys resolve to manufacturing.
    pub fn profile(&self, key: &str) -> &IndustryProfile {
        self.get(IndustryKey::resolve(key))
    }
}

fn categories(entries: &[(&str, f64)]) -> Vec<CategoryWeight> {
    entries
        .iter()
        .map(|(name, weight)| CategoryWeight {
            name: (*name).to_string(),
            weight: *weight,
        })
        .collect()
}

fn event(month: u32, day: u32, inflow_factor: f64, outflow_factor: f64, name: &str) -> SpecialEvent {
    SpecialEvent {
        month,
        day,
        inflow_factor,
        outflow_factor,
        name: name.to_string(),
    }
}

fn retail() -> IndustryProfile {
    IndustryProfile {
        key: IndustryKey::Retail,
        label: "Retail".into(),
        monthly_inflow_factors: vec![0.8, 0.75, 0.85, 0.9, 0.95, 0.95, 0.9, 1.0, 0.95, 1.05, 1.35, 1.6],
        monthly_outflow_factors: vec![0.85, 0.8, 0.9, 0.95, 1.0, 1.0, 0.95, 1.05, 1.1, 1.25, 1.4, 1.3],
        weekday_factors: vec![1.3, 0.8, 0.85, 0.9, 0.95, 1.15, 1.4],
        special_events: vec![
            event(7, 4, 1.3, 1.0, "Independence Day Sale"),
            event(11, 25, 2.5, 1.2, "Black Friday"),
            event(11, 28, 2.0, 1.1, "Cyber Monday"),
            event(12, 24, 1.8, 1.1, "Christmas Eve"),
            event(12, 26, 1.6, 1.0, "Boxing Day Sales"),
        ],
        average_dso: 5.0,
        average_dpo: 30.0,
        average_dio: 45.0,
        daily_variability: 0.15,
        transaction_categories: TransactionCategories {
            inflows: categories(&[
                ("In-store Sales", 0.45),
                ("Online Sales", 0.35),
                ("Wholesale Orders", 0.15),
                ("Gift Cards", 0.08),
                ("Returns (Refunds)", -0.05),
            ]),
            outflows: categories(&[
                ("Inventory", 0.35),
                ("Payroll", 0.2),
                ("Rent", 0.1),
                ("Utilities", 0.05),
                ("Marketing", 0.1),
                ("Software", 0.05),
                ("Insurance", 0.05),
                ("Logistics", 0.1),
            ]),
        },
        base_daily_inflow: 12_000.0,
        starting_balance: 250_000.0,
        cost_base: CostBase {
            payroll: 45_000.0,
            rent: 18_000.0,
            utilities: 4_500.0,
            software: 2_500.0,
            insurance: 9_000.0,
            inventory: 35_000.0,
            marketing: 12_000.0,
            ..CostBase::default()
        },
        customer_payment_terms: vec![0, 0, 7, 15],
        vendor_payment_terms: vec![30, 45, 60],
    }
}

fn manufacturing() -> IndustryProfile {
    IndustryProfile {
        key: IndustryKey::Manufacturing,
        label: "Manufacturing".into(),
        monthly_inflow_factors: vec![0.9, 0.95, 1.05, 1.05, 1.1, 1.05, 0.8, 0.75, 1.05, 1.1, 1.05, 0.95],
        monthly_outflow_factors: vec![0.95, 0.95, 1.05, 1.05, 1.1, 1.05, 0.85, 0.8, 1.1, 1.1, 1.0, 0.9],
        weekday_factors: vec![0.2, 1.15, 1.2, 1.2, 1.15, 1.1, 0.3],
        special_events: vec![
            event(1, 2, 1.4, 1.1, "New Year Orders"),
            event(3, 31, 1.5, 1.0, "Quarter-End Push"),
            event(7, 15, 0.3, 0.5, "Summer Shutdown"),
            event(9, 30, 1.5, 1.0, "Quarter-End Push"),
            event(12, 24, 0.2, 0.6, "Holiday Closure"),
        ],
        average_dso: 45.0,
        average_dpo: 40.0,
        average_dio: 60.0,
        daily_variability: 0.12,
        transaction_categories: TransactionCategories {
            inflows: categories(&[
                ("Product Sales", 0.6),
                ("Contract Manufacturing", 0.25),
                ("Spare Parts", 0.1),
                ("Service & Maintenance", 0.05),
            ]),
            outflows: categories(&[
                ("Raw Materials", 0.4),
                ("Payroll", 0.25),
                ("Rent", 0.08),
                ("Utilities", 0.08),
                ("Equipment Maintenance", 0.07),
                ("Insurance", 0.05),
                ("Logistics", 0.07),
            ]),
        },
        base_daily_inflow: 30_000.0,
        starting_balance: 500_000.0,
        cost_base: CostBase {
            payroll: 110_000.0,
            rent: 35_000.0,
            utilities: 15_000.0,
            insurance: 24_000.0,
            raw_materials: 140_000.0,
            marketing: 8_000.0,
            ..CostBase::default()
        },
        customer_payment_terms: vec![30, 45, 60],
        vendor_payment_terms: vec![30, 45, 60, 90],
    }
}

fn saas() -> IndustryProfile {
    IndustryProfile {
        key: IndustryKey::Saas,
        label: "SaaS".into(),
        monthly_inflow_factors: vec![1.15, 0.95, 1.1, 1.0, 0.95, 1.05, 0.95, 0.9, 1.05, 1.0, 1.0, 1.25],
        monthly_outflow_factors: vec![1.0, 0.95, 1.0, 1.0, 1.0, 1.05, 1.0, 0.95, 1.05, 1.05, 1.0, 1.1],
        weekday_factors: vec![0.4, 1.2, 1.15, 1.1, 1.1, 1.05, 0.45],
        special_events: vec![
            event(1, 1, 1.8, 1.0, "New Year Renewals"),
            event(3, 31, 1.6, 1.0, "Q1 Close"),
            event(6, 30, 1.6, 1.0, "Q2 Close"),
            event(9, 30, 1.6, 1.0, "Q3 Close"),
            event(12, 31, 2.0, 1.1, "Year-End Deals"),
        ],
        average_dso: 30.0,
        average_dpo: 25.0,
        average_dio: 0.0,
        daily_variability: 0.1,
        transaction_categories: TransactionCategories {
            inflows: categories(&[
                ("Subscription Revenue", 0.7),
                ("Professional Services", 0.15),
                ("Usage Overage", 0.1),
                ("Annual Prepayments", 0.1),
                ("Credits & Refunds", -0.03),
            ]),
            outflows: categories(&[
                ("Payroll", 0.45),
                ("Cloud Infrastructure", 0.2),
                ("Software", 0.08),
                ("Marketing", 0.15),
                ("Rent", 0.06),
                ("Utilities", 0.02),
                ("Insurance", 0.04),
            ]),
        },
        base_daily_inflow: 20_000.0,
        starting_balance: 350_000.0,
        cost_base: CostBase {
            payroll: 150_000.0,
            rent: 25_000.0,
            utilities: 3_000.0,
            software: 12_000.0,
            insurance: 15_000.0,
            cloud_infrastructure: 60_000.0,
            marketing: 40_000.0,
            ..CostBase::default()
        },
        customer_payment_terms: vec![0, 15, 30],
        vendor_payment_terms: vec![15, 30, 45],
    }
}
