//! Normalization statistics gathered from the survivors of filtering.

use std::sync::Mutex;

use model::{Provider, Stake};

use crate::task::{into_inner, lock};

/// Immutable stake range and feature ceiling of the surviving set.
///
/// Only obtainable from a `ScoringContextBuilder` that observed at least one
/// provider, or from explicit values; it is never built from an empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringContext {
    max_stake: Stake,
    min_stake: Stake,
    max_feature_count: usize,
}

impl ScoringContext {
    /// Build a context from explicit statistics.
    ///
    /// The bounds are reordered if given backwards.
    pub fn new(min_stake: Stake, max_stake: Stake, max_feature_count: usize) -> Self {
        Self {
            max_stake: max_stake.max(min_stake),
            min_stake: min_stake.min(max_stake),
            max_feature_count,
        }
    }

    fn seed(provider: &Provider) -> Self {
        Self {
            max_stake: provider.stake,
            min_stake: provider.stake,
            max_feature_count: provider.features.len(),
        }
    }

    fn fold(&mut self, provider: &Provider) {
        self.max_stake = self.max_stake.max(provider.stake);
        self.min_stake = self.min_stake.min(provider.stake);
        self.max_feature_count = self.max_feature_count.max(provider.features.len());
    }

    pub fn max_stake(&self) -> Stake {
        self.max_stake
    }

    pub fn min_stake(&self) -> Stake {
        self.min_stake
    }

    pub fn max_feature_count(&self) -> usize {
        self.max_feature_count
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    stats: Option<ScoringContext>,
    observed: usize,
}

/// Concurrent accumulator fed by filter-phase tasks.
///
/// `observe` takes `&self` so any number of workers can share one builder.
/// `finalize` takes the builder by value: once the filter phase hands it
/// over, nothing can fold into it again.
#[derive(Debug, Default)]
pub struct ScoringContextBuilder {
    state: Mutex<Accumulator>,
}

impl ScoringContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a surviving provider into the running statistics.
    pub fn observe(&self, provider: &Provider) {
        let mut state = lock(&self.state);
        match state.stats.as_mut() {
            Some(stats) => stats.fold(provider),
            None => state.stats = Some(ScoringContext::seed(provider)),
        }
        state.observed += 1;
    }

    /// Number of providers folded in so far.
    pub fn observed(&self) -> usize {
        lock(&self.state).observed
    }

    /// Snapshot the statistics. `None` if no provider was observed.
    pub fn finalize(self) -> Option<ScoringContext> {
        into_inner(self.state).stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn provider(stake: Stake, features: &[&str]) -> Provider {
        Provider::new("p", stake, "EU", features.iter().copied())
    }

    #[test]
    fn test_empty_builder_finalizes_to_none() {
        let builder = ScoringContextBuilder::new();
        assert_eq!(builder.observed(), 0);
        assert!(builder.finalize().is_none());
    }

    #[test]
    fn test_single_provider() {
        let builder = ScoringContextBuilder::new();
        builder.observe(&provider(42, &["rpc", "rest"]));

        let context = builder.finalize().unwrap();
        assert_eq!(context.min_stake(), 42);
        assert_eq!(context.max_stake(), 42);
        assert_eq!(context.max_feature_count(), 2);
    }

    #[test]
    fn test_tracks_range_and_feature_ceiling() {
        let builder = ScoringContextBuilder::new();
        builder.observe(&provider(150, &["rest", "rpc"]));
        builder.observe(&provider(200, &["grpc", "rest", "rpc"]));
        builder.observe(&provider(100, &[]));

        assert_eq!(builder.observed(), 3);
        let context = builder.finalize().unwrap();
        assert_eq!(context, ScoringContext::new(100, 200, 3));
    }

    #[test]
    fn test_concurrent_observers() {
        let builder = ScoringContextBuilder::new();
        thread::scope(|scope| {
            for stake in 1..=64 {
                let builder = &builder;
                scope.spawn(move || {
                    let features: Vec<String> = (0..stake % 7).map(|i| format!("f{i}")).collect();
                    builder.observe(&Provider::new(format!("{stake}"), stake, "", features));
                });
            }
        });

        assert_eq!(builder.observed(), 64);
        let context = builder.finalize().unwrap();
        assert_eq!(context.min_stake(), 1);
        assert_eq!(context.max_stake(), 64);
        assert_eq!(context.max_feature_count(), 6);
    }

    #[test]
    fn test_new_reorders_backwards_bounds() {
        let context = ScoringContext::new(300, 100, 0);
        assert_eq!(context.min_stake(), 100);
        assert_eq!(context.max_stake(), 300);
    }
}
