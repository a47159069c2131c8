//! Feature richness scoring.

use crate::context::ScoringContext;
use crate::traits::Scorer;
use model::{ConsumerPolicy, Provider};

/// Rewards providers offering more than the required features, relative to
/// the richest survivor.
///
/// ## Algorithm
/// `extra = offered - required`, then
/// `min(1, (extra + required) / max_feature_count)`, or 0 when no survivor
/// offers any feature.
pub struct FeatureScorer;

impl FeatureScorer {
    pub const NAME: &'static str = "feature";
}

impl Scorer for FeatureScorer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn score(&self, provider: &Provider, policy: &ConsumerPolicy, context: &ScoringContext) -> f64 {
        if context.max_feature_count() == 0 {
            return 0.0;
        }
        let required = policy.required_features.len() as f64;
        let extra = provider.features.len() as f64 - required;
        ((extra + required) / context.max_feature_count() as f64).min(1.0)
    }
}
