//! The transaction record every generator emits.

use crate::partner_generator::{CustomerTier, PaymentReliability};
use crate::rng::RandomSource;
use crate::types::{EntityId, Money};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    Inflow,
    Outflow,
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inflow => f.write_str("inflow"),
            Self::Outflow => f.write_str("outflow"),
        }
    }
}

/// The owning customer's collection terms. Present only on invoiced
/// customer inflows; its presence is what makes a transaction eligible
/// for settlement-date projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementTerms {
    pub payment_terms: u32,
    pub reliability: PaymentReliability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Settlement (cash) date.
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: FlowType,
    pub category: String,
    pub amount: Money,
    pub entity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_tier: Option<CustomerTier>,
    #[serde(default)]
    pub is_recurring: bool,
    /// Original invoice date, set once the settlement date is projected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<SettlementTerms>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

impl Transaction {
    /// A bare transaction with a fresh id. Amounts are stored as a
    /// rounded magnitude; direction lives in `kind`.
    pub fn new(
        rng: &mut dyn RandomSource,
        date: NaiveDate,
        kind: FlowType,
        category: impl Into<String>,
        amount: Money,
        entity: impl Into<String>,
    ) -> Self {
        Self {
            id: transaction_id(rng),
            date,
            kind,
            category: category.into(),
            amount: round_cents(amount.abs()),
            entity: entity.into(),
            entity_id: None,
            entity_tier: None,
            is_recurring: false,
            invoice_date: None,
            settlement: None,
            notes: String::new(),
            event: None,
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.kind == FlowType::Inflow
    }
}

/// A v4-format UUID built from the injected random source so seeded
/// runs keep stable ids.
pub fn transaction_id(rng: &mut dyn RandomSource) -> String {
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&rng.next_u64().to_le_bytes());
    bytes[8..].copy_from_slice(&rng.next_u64().to_le_bytes());
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

pub fn round_cents(amount: Money) -> Money {
    (amount * 100.0).round() / 100.0
}
