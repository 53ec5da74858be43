//! Business partner roster: customers and vendors for one run.
//!
//! The roster is drawn once per historical run and reused by the
//! forecast. Share weights are normalized per group so each sums to 1.

use crate::config::IndustryProfile;
use crate::name_generator::NameGenerator;
use crate::rng::RandomSource;
use crate::types::EntityId;
use crate::weighted::{pick_uniform, pick_weighted};
use serde::{Deserialize, Serialize};

pub const MIN_CUSTOMERS: u32 = 15;
pub const MAX_CUSTOMERS: u32 = 34;
pub const MIN_VENDORS: u32 = 8;
pub const MAX_VENDORS: u32 = 19;

const UPPER_CUT: f64 = 0.8;
const MIDDLE_CUT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTier {
    Small,
    Medium,
    Large,
}

impl CustomerTier {
    fn from_roll(roll: f64) -> Self {
        if roll > UPPER_CUT {
            Self::Large
        } else if roll > MIDDLE_CUT {
            Self::Medium
        } else {
            Self::Small
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Self::Large => 5.0,
            Self::Medium => 2.0,
            Self::Small => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorImportance {
    Standard,
    Important,
    Critical,
}

impl VendorImportance {
    fn from_roll(roll: f64) -> Self {
        if roll > UPPER_CUT {
            Self::Critical
        } else if roll > MIDDLE_CUT {
            Self::Important
        } else {
            Self::Standard
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Self::Critical => 8.0,
            Self::Important => 3.0,
            Self::Standard => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentReliability {
    Early,
    OnTime,
    Late,
}

impl PaymentReliability {
    fn from_roll(roll: f64) -> Self {
        if roll < 0.2 {
            Self::Early
        } else if roll < 0.75 {
            Self::OnTime
        } else {
            Self::Late
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: EntityId,
    pub name: String,
    pub tier: CustomerTier,
    pub share: f64,
    pub payment_terms: u32,
    pub payment_reliability: PaymentReliability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: EntityId,
    pub name: String,
    pub importance: VendorImportance,
    pub share: f64,
    pub payment_terms: u32,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessPartners {
    pub customers: Vec<Customer>,
    pub vendors: Vec<Vendor>,
}

impl BusinessPartners {
    /// Cumulative-share weighted customer choice.
    pub fn pick_customer(&self, rng: &mut dyn RandomSource) -> Option<&Customer> {
        pick_weighted(&self.customers, |c| c.share, rng)
    }

    /// Uniform choice among small-tier customers, falling back to the
    /// weighted choice when the roster has none.
    pub fn pick_small_customer(&self, rng: &mut dyn RandomSource) -> Option<&Customer> {
        let small: Vec<&Customer> = self
            .customers
            .iter()
            .filter(|c| c.tier == CustomerTier::Small)
            .collect();
        match pick_uniform(&small, rng) {
            Some(customer) => Some(*customer),
            None => self.pick_customer(rng),
        }
    }

    /// Share-weighted choice among vendors supplying `category`.
    pub fn pick_vendor_for(&self, category: &str, rng: &mut dyn RandomSource) -> Option<&Vendor> {
        let matching: Vec<&Vendor> = self
            .vendors
            .iter()
            .filter(|v| v.category == category)
            .collect();
        pick_weighted(&matching, |v| v.share, rng).copied()
    }

    pub fn vendor_named(&self, name: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.name == name)
    }

    pub fn customer_named(&self, name: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.name == name)
    }
}

pub struct BusinessPartnerGenerator;

impl BusinessPartnerGenerator {
    pub fn generate(profile: &IndustryProfile, rng: &mut dyn RandomSource) -> BusinessPartners {
        let customers = Self::generate_customers(profile, rng);
        let vendors = Self::generate_vendors(profile, rng);
        log::debug!(
            "partners: {} customers, {} vendors for {}",
            customers.len(),
            vendors.len(),
            profile.key
        );
        BusinessPartners { customers, vendors }
    }

    fn generate_customers(profile: &IndustryProfile, rng: &mut dyn RandomSource) -> Vec<Customer> {
        let n = rng.int_inclusive(MIN_CUSTOMERS, MAX_CUSTOMERS);
        let mut customers = Vec::with_capacity(n as usize);

        for i in 0..n {
            let tier = CustomerTier::from_roll(rng.next_f64());
            let payment_terms = pick_uniform(&profile.customer_payment_terms, rng)
                .copied()
                .unwrap_or(30);
            let payment_reliability = PaymentReliability::from_roll(rng.next_f64());
            customers.push(Customer {
                id: format!("cust-{:03}", i + 1),
                name: NameGenerator::customer_name(profile.key, rng),
                tier,
                share: tier.weight(),
                payment_terms,
                payment_reliability,
            });
        }

        let total: f64 = customers.iter().map(|c| c.share).sum();
        for c in &mut customers {
            c.share /= total;
        }
        customers
    }

    fn generate_vendors(profile: &IndustryProfile, rng: &mut dyn RandomSource) -> Vec<Vendor> {
        let n = rng.int_inclusive(MIN_VENDORS, MAX_VENDORS);
        let categories = profile.outflow_category_names();
        let mut vendors = Vec::with_capacity(n as usize);

        for i in 0..n {
            let importance = VendorImportance::from_roll(rng.next_f64());
            let category = pick_uniform(&categories, rng)
                .map(|c| c.to_string())
                .unwrap_or_else(|| "General".to_string());
            let payment_terms = pick_uniform(&profile.vendor_payment_terms, rng)
                .copied()
                .unwrap_or(30);
            vendors.push(Vendor {
                id: format!("vend-{:03}", i + 1),
                name: NameGenerator::vendor_name(&category, rng),
                importance,
                share: importance.weight(),
                payment_terms,
                category,
            });
        }

        let total: f64 = vendors.iter().map(|v| v.share).sum();
        for v in &mut vendors {
            v.share /= total;
        }
        vendors
    }
}
