//! Weighted random choice shared by every generator.
//!
//! Weights are relative draw probabilities and need not sum to 1.
//! The absolute value is used, so a negative (refund-like) category
//! is drawn as often as a positive one of the same magnitude.

use crate::rng::RandomSource;

/// Pick one item by cumulative weight. Returns `None` for an empty
/// slice or when every weight is zero.
pub fn pick_weighted<'a, T, F>(items: &'a [T], weight: F, rng: &mut dyn RandomSource) -> Option<&'a T>
where
    F: Fn(&T) -> f64,
{
    let total: f64 = items.iter().map(|item| weight(item).abs()).sum();
    if items.is_empty() || total <= 0.0 || !total.is_finite() {
        return None;
    }

    let roll = rng.next_f64() * total;
    let mut cumulative = 0.0;
    for item in items {
        cumulative += weight(item).abs();
        if roll < cumulative {
            return Some(item);
        }
    }
    // Rounding can leave roll a hair above the last boundary.
    items.iter().rev().find(|item| weight(item).abs() > 0.0)
}

/// Pick one item uniformly.
pub fn pick_uniform<'a, T>(items: &'a [T], rng: &mut dyn RandomSource) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = rng.next_u64_below(items.len() as u64) as usize;
    items.get(index)
}
