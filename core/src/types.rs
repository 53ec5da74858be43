//! Shared primitive types used across the generator.

/// A currency amount. Always non-negative on a transaction; the
/// direction is carried by `FlowType`.
pub type Money = f64;

/// A stable identifier for a customer, vendor or transaction.
pub type EntityId = String;

/// Zero-based offset of a day from the start of its generation window.
pub type DayOffset = u32;
