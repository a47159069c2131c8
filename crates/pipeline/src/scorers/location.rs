//! Location scoring with a coarse region proximity table.

use crate::context::ScoringContext;
use crate::traits::Scorer;
use model::{ConsumerPolicy, Provider};

/// Scores how close a provider's region is to the required one.
///
/// ## Algorithm
/// 1. No required location, or exact match: 1.0
/// 2. Charted region pair: the table value
/// 3. Anything else: 0.0
///
/// Region labels are compared exactly.
pub struct LocationScorer;

impl LocationScorer {
    pub const NAME: &'static str = "location";

    /// Proximity of a provider in `provider` to a consumer requiring
    /// `required`. Entries are directed; the current table is symmetric.
    pub fn proximity(required: &str, provider: &str) -> Option<f64> {
        match (required, provider) {
            ("EU", "US") | ("US", "EU") => Some(0.5),
            ("EU", "ASIA") | ("ASIA", "EU") => Some(0.3),
            ("US", "ASIA") | ("ASIA", "US") => Some(0.3),
            _ => None,
        }
    }
}

impl Scorer for LocationScorer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn score(&self, provider: &Provider, policy: &ConsumerPolicy, _context: &ScoringContext) -> f64 {
        let Some(required) = policy.required_location() else {
            return 1.0;
        };
        if provider.location == required {
            return 1.0;
        }
        Self::proximity(required, &provider.location).unwrap_or(0.0)
    }
}
