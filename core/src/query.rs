//! Read-only views over a finished dataset.

use crate::customer_generator::WALK_IN_CUSTOMER;
use crate::dataset::{ForecastDataset, HistoricalDataset};
use crate::partner_generator::{BusinessPartners, CustomerTier, VendorImportance};
use crate::transaction::{round_cents, FlowType, Transaction};
use crate::types::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anything that exposes a settled transaction list and its roster.
pub trait TransactionSet {
    fn transactions(&self) -> &[Transaction];
    fn partners(&self) -> &BusinessPartners;
}

impl TransactionSet for HistoricalDataset {
    fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    fn partners(&self) -> &BusinessPartners {
        &self.business_partners
    }
}

impl TransactionSet for ForecastDataset {
    fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    fn partners(&self) -> &BusinessPartners {
        &self.business_partners
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Customer,
    Vendor,
}

impl EntityType {
    fn flow(&self) -> FlowType {
        match self {
            Self::Customer => FlowType::Inflow,
            Self::Vendor => FlowType::Outflow,
        }
    }

    /// Whether `txn` is counted towards this kind of counterparty.
    /// Refunds go out to customers, so they never rank as vendor spend.
    fn counts(&self, txn: &Transaction, partners: &BusinessPartners) -> bool {
        txn.kind == self.flow()
            && match self {
                Self::Customer => true,
                Self::Vendor => !is_customer_refund(txn, partners),
            }
    }
}

fn is_customer_refund(txn: &Transaction, partners: &BusinessPartners) -> bool {
    txn.entity_tier.is_some()
        || txn.entity == WALK_IN_CUSTOMER
        || txn
            .entity_id
            .as_deref()
            .is_some_and(|id| partners.customers.iter().any(|c| c.id == id))
        || partners.customer_named(&txn.entity).is_some()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTotal {
    pub name: String,
    pub total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<CustomerTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<VendorImportance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Money,
}

/// Transactions dated inside `[start, end]` (either bound optional),
/// ascending by date. Same-day order is the dataset's order.
pub fn get_transaction_details<D: TransactionSet + ?Sized>(
    dataset: &D,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = dataset
        .transactions()
        .iter()
        .filter(|t| start.map_or(true, |s| t.date >= s))
        .filter(|t| end.map_or(true, |e| t.date <= e))
        .cloned()
        .collect();
    out.sort_by_key(|t| t.date);
    out
}

/// Largest counterparties by total amount, descending.
///
/// Customers are ranked on inflows, vendors on outflows other than
/// customer refunds.
pub fn get_top_entities<D: TransactionSet + ?Sized>(
    dataset: &D,
    entity_type: EntityType,
    count: usize,
) -> Vec<EntityTotal> {
    let partners = dataset.partners();
    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for txn in dataset.transactions().iter().filter(|t| entity_type.counts(t, partners)) {
        *totals.entry(txn.entity.as_str()).or_default() += txn.amount;
    }

    let mut ranked: Vec<EntityTotal> = totals
        .into_iter()
        .map(|(name, total)| {
            let (tier, importance) = match entity_type {
                EntityType::Customer => (partners.customer_named(name).map(|c| c.tier), None),
                EntityType::Vendor => (None, partners.vendor_named(name).map(|v| v.importance)),
            };
            EntityTotal {
                name: name.to_string(),
                total: round_cents(total),
                tier,
                importance,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    ranked.truncate(count);
    ranked
}

/// Totals per category for one direction, descending.
pub fn get_category_breakdown<D: TransactionSet + ?Sized>(dataset: &D, flow: FlowType) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for txn in dataset.transactions().iter().filter(|t| t.kind == flow) {
        *totals.entry(txn.category.as_str()).or_default() += txn.amount;
    }
    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(name, total)| CategoryTotal {
            name: name.to_string(),
            total: round_cents(total),
        })
        .collect();
    out.sort_by(|a, b| b.total.total_cmp(&a.total));
    out
}
