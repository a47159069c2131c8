//! Filter to enforce the consumer's minimum stake.

use crate::traits::Filter;
use model::{ConsumerPolicy, Provider};

/// Keeps providers with `stake >= min_stake`.
pub struct StakeMinimumFilter;

impl Filter for StakeMinimumFilter {
    fn name(&self) -> &str {
        "StakeMinimumFilter"
    }

    fn apply(&self, provider: &Provider, policy: &ConsumerPolicy) -> bool {
        provider.stake >= policy.min_stake
    }
}
