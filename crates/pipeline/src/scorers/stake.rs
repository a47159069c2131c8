//! Linear stake scoring.

use crate::context::ScoringContext;
use crate::traits::Scorer;
use model::{ConsumerPolicy, Provider};

/// Min-max normalizes a provider's stake over the surviving set.
///
/// When every survivor has the same stake the range is degenerate and all of
/// them score 1.0.
pub struct StakeScorer;

impl StakeScorer {
    pub const NAME: &'static str = "stake";
}

impl Scorer for StakeScorer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn score(&self, provider: &Provider, _policy: &ConsumerPolicy, context: &ScoringContext) -> f64 {
        if context.max_stake() == context.min_stake() {
            return 1.0;
        }
        let range = (context.max_stake() as f64) - (context.min_stake() as f64);
        ((provider.stake as f64) - (context.min_stake() as f64)) / range
    }
}
