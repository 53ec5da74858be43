//! Random number plumbing for the generators.
//!
//! RULE: No generator reaches for a global RNG.
//! Every stage receives a `&mut dyn RandomSource` from the engine.
//!
//! Each stage gets its own stream, seeded deterministically
//! from (master_seed XOR stage_index). This means:
//!   - Adding a new stage never changes existing stages' streams.
//!   - Each stage's stream is fully reproducible in isolation.
//!   - Tests can swap in `ScriptedRng` to pin exact draws.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// The single capability every generator needs: a float in [0.0, 1.0).
/// Everything else is derived from it.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Draw a raw u64. Sources with a native integer stream override this.
    fn next_u64(&mut self) -> u64 {
        (self.next_f64() * (u64::MAX as f64)) as u64
    }

    /// Roll a u64 in [0, n).
    fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        ((self.next_f64() * n as f64) as u64).min(n - 1)
    }

    /// Uniform float in [lo, hi).
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform integer in [lo, hi], both ends inclusive.
    fn int_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        debug_assert!(lo <= hi);
        lo + self.next_u64_below(u64::from(hi - lo) + 1) as u32
    }

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Multiplier in [1 - band, 1 + band).
    fn jitter(&mut self, band: f64) -> f64 {
        1.0 + (self.next_f64() * 2.0 - 1.0) * band
    }
}

/// A named PCG stream for a single generation stage.
pub struct StageRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StageRng {
    /// Create a stage RNG from the master seed and a stable
    /// stage index. The index must never change once assigned.
    pub fn new(master_seed: u64, stage_index: u64) -> Self {
        let derived_seed = master_seed ^ (stage_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl RandomSource for StageRng {
    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }
}

/// All stage RNGs for a single run, keyed by stable slot.
#[derive(Debug, Clone, Copy)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Unseeded production behaviour: a fresh master seed per run.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_stage(&self, slot: StageSlot) -> StageRng {
        StageRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stage slot assignments.
/// NEVER reorder or remove entries, only append.
/// Reordering changes every stage's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StageSlot {
    Partners = 0,
    Recurring = 1,
    CustomerFlows = 2,
    PaymentTerms = 3,
    Kpi = 4,
    OpeningBalance = 5,
    ForecastRecurring = 6,
    ForecastCustomerFlows = 7,
    ForecastPaymentTerms = 8,
    ForecastKpi = 9,
    ForecastPartners = 10,
}

impl StageSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Partners => "partners",
            Self::Recurring => "recurring",
            Self::CustomerFlows => "customer_flows",
            Self::PaymentTerms => "payment_terms",
            Self::Kpi => "kpi",
            Self::OpeningBalance => "opening_balance",
            Self::ForecastRecurring => "forecast_recurring",
            Self::ForecastCustomerFlows => "forecast_customer_flows",
            Self::ForecastPaymentTerms => "forecast_payment_terms",
            Self::ForecastKpi => "forecast_kpi",
            Self::ForecastPartners => "forecast_partners",
        }
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
/// Used by tests to force specific branches.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "ScriptedRng needs at least one draw");
        Self { draws, cursor: 0 }
    }

    /// Always returns the same value.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
