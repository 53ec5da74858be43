//! Transaction source trait.
//!
//! RULE: Every day-walking generator implements TransactionSource.
//! The engine runs each registered source over the whole window with
//! its own RNG stream, then concatenates the outputs in registration
//! order. Sources never see each other's transactions.

use crate::calendar::DateWindow;
use crate::config::IndustryProfile;
use crate::partner_generator::BusinessPartners;
use crate::rng::{RandomSource, RngBank, StageSlot};
use crate::transaction::Transaction;
use chrono::NaiveDate;

/// Read-only inputs shared by every source for one window.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub profile: &'a IndustryProfile,
    pub partners: &'a BusinessPartners,
    pub window: DateWindow,
}

/// The contract every generator must fulfill.
pub trait TransactionSource {
    /// Unique stable name for this source.
    fn name(&self) -> &'static str;

    /// Called once per calendar day, in ascending order.
    ///
    /// - `date`: the day being generated
    /// - `ctx`:  profile, roster and window for this run
    /// - `rng`:  this source's stream
    fn generate_day(
        &mut self,
        date: NaiveDate,
        ctx: &GenerationContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Vec<Transaction>;

    /// Walk every day of the window.
    fn generate(&mut self, ctx: &GenerationContext<'_>, rng: &mut dyn RandomSource) -> Vec<Transaction> {
        let mut out = Vec::new();
        for date in ctx.window.days() {
            out.extend(self.generate_day(date, ctx, rng));
        }
        log::debug!(
            "source={} window={}..{}: {} txns",
            self.name(),
            ctx.window.start,
            ctx.window.end,
            out.len()
        );
        out
    }
}

/// A source bound to its stable RNG slot.
pub type SlottedSource = (StageSlot, Box<dyn TransactionSource>);

/// Run every source over the window in order, each on its own stream,
/// and concatenate the results.
pub fn run_sources(sources: &mut [SlottedSource], ctx: &GenerationContext<'_>, bank: &RngBank) -> Vec<Transaction> {
    let mut out = Vec::new();
    for (slot, source) in sources.iter_mut() {
        let mut rng = bank.for_stage(*slot);
        out.extend(source.generate(ctx, &mut rng));
    }
    out
}
