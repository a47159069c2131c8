//! Core traits for the pairing pipeline.
//!
//! Filters and scorers are evaluated one provider at a time so the pipelines
//! can fan the work out across worker threads.

use crate::context::ScoringContext;
use model::{ConsumerPolicy, Provider};

/// A hard constraint a provider must satisfy.
///
/// `Send + Sync` lets a single filter instance be shared by every worker of a
/// phase. Implementations must be pure: the decision may depend only on the
/// provider and the policy.
pub trait Filter: Send + Sync {
    /// Identifier used in diagnostics
    fn name(&self) -> &str;

    /// Returns `true` when the provider passes.
    ///
    /// Both arguments are normalized: provider features and policy required
    /// features are sorted and deduplicated.
    fn apply(&self, provider: &Provider, policy: &ConsumerPolicy) -> bool;
}

/// A single scoring criterion.
pub trait Scorer: Send + Sync {
    /// Identifier used in diagnostics, as the weight key and as the key of
    /// the per-criterion component in a `PairingScore`
    fn name(&self) -> &str;

    /// Score a surviving provider in `[0, 1]`.
    fn score(&self, provider: &Provider, policy: &ConsumerPolicy, context: &ScoringContext) -> f64;
}
