//! Filter for the consumer's location requirement.
//!
//! Distance-based rejection is not implemented yet: once a location is
//! required, any provider that declares some location passes. The threshold
//! is carried so a real proximity metric can be dropped in without changing
//! how the filter is constructed. Until then, `LocationScorer`'s proximity
//! table is the only distance signal in a ranking.

use crate::traits::Filter;
use model::{ConsumerPolicy, Provider};

/// Rejects providers with no location when the policy requires one.
///
/// ## Algorithm
/// 1. No required location: pass
/// 2. Provider has no location: reject
/// 3. Otherwise: pass (proximity check pending)
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationProximityFilter {
    proximity_threshold: f64,
}

impl LocationProximityFilter {
    /// Create a new LocationProximityFilter.
    ///
    /// # Arguments
    /// * `proximity_threshold` - Minimum proximity a provider would need once
    ///   distance is computed (currently unused by the decision)
    pub fn new(proximity_threshold: f64) -> Self {
        Self { proximity_threshold }
    }

    pub fn proximity_threshold(&self) -> f64 {
        self.proximity_threshold
    }
}

impl Filter for LocationProximityFilter {
    fn name(&self) -> &str {
        "LocationProximityFilter"
    }

    fn apply(&self, provider: &Provider, policy: &ConsumerPolicy) -> bool {
        if policy.required_location().is_none() {
            return true;
        }
        provider.has_location()
    }
}
