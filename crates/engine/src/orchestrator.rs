//! # Pairing Orchestrator
//!
//! This module coordinates a pairing request:
//! 1. Validate the request and normalize a private copy of the policy
//! 2. Filter phase: one task per provider, feeding the scoring context
//! 3. Barrier: every filter task completes, then the context is finalized
//! 4. Score phase: one task per survivor against the finalized context
//! 5. Rank and keep the top K
//!
//! Both phases share the orchestrator's worker pool, whose size is the
//! concurrency limit. Neither phase has a timeout: a stuck filter or scorer
//! holds up its whole request.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use model::{ConsumerPolicy, Provider};
use pipeline::filters::{
    AddressPresenceFilter, LocationProximityFilter, RequiredFeaturesFilter, StakeMinimumFilter,
};
use pipeline::scorers::{FeatureScorer, LocationScorer, StakeScorer};
use pipeline::task::panic_message;
use pipeline::{FilterPipeline, PairingScore, ScoringPipeline};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, error, info};

use crate::config::PairingConfig;
use crate::error::{PairingError, Result};
use crate::ranker::Ranker;

/// Matches providers against consumer policies.
///
/// Cloning is cheap; clones share the worker pool.
#[derive(Clone)]
pub struct PairingOrchestrator {
    config: PairingConfig,
    pool: Arc<ThreadPool>,
}

impl PairingOrchestrator {
    /// Create an orchestrator and its worker pool.
    ///
    /// Fails with `PairingError::Config` if the configuration is invalid or
    /// the pool cannot be started.
    pub fn new(config: PairingConfig) -> Result<Self> {
        config.validate()?;
        let threads = config.concurrency();
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pairing-worker-{i}"))
            .build()
            .map_err(|e| PairingError::Config(format!("cannot start worker pool: {e}")))?;
        info!("Pairing orchestrator ready with {} workers", threads);

        Ok(Self {
            config,
            pool: Arc::new(pool),
        })
    }

    pub fn config(&self) -> &PairingConfig {
        &self.config
    }

    /// Number of workers available to each phase.
    pub fn concurrency(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Main entry point: the ranked short-list of providers for a policy.
    ///
    /// Returns at most `top_k` providers, best first, as normalized copies.
    pub fn get_pairing_list(
        &self,
        providers: &[Provider],
        policy: Option<&ConsumerPolicy>,
    ) -> Result<Vec<Provider>> {
        let ranked = self.rank_providers(providers, policy)?;
        Ok(ranked
            .into_iter()
            .map(|score| Arc::unwrap_or_clone(score.provider))
            .collect())
    }

    /// Same as `get_pairing_list`, but keeps each provider's total and
    /// component scores.
    pub fn rank_providers(
        &self,
        providers: &[Provider],
        policy: Option<&ConsumerPolicy>,
    ) -> Result<Vec<PairingScore>> {
        guarded(|| self.pair(providers, policy))
    }

    /// Run the filter phase alone and return the survivors.
    pub fn filter_providers(
        &self,
        providers: &[Provider],
        policy: Option<&ConsumerPolicy>,
    ) -> Result<Vec<Arc<Provider>>> {
        guarded(|| {
            let policy = validate_request(providers, policy)?;
            Ok(self
                .filter_pipeline()
                .apply(&self.pool, providers, &policy)
                .survivors)
        })
    }

    /// Async variant of `get_pairing_list` for callers on a tokio runtime.
    ///
    /// The request runs on the blocking thread pool so the runtime's workers
    /// are never held by CPU-bound filtering and scoring.
    pub async fn get_pairing_list_async(
        &self,
        providers: Vec<Provider>,
        policy: Option<ConsumerPolicy>,
    ) -> Result<Vec<Provider>> {
        let orchestrator = self.clone();
        tokio::task::spawn_blocking(move || {
            orchestrator.get_pairing_list(&providers, policy.as_ref())
        })
        .await
        .map_err(|e| PairingError::Internal(format!("pairing task failed: {e}")))?
    }

    /// Filters in evaluation order.
    fn filter_pipeline(&self) -> FilterPipeline {
        FilterPipeline::new()
            .verbose(self.config.verbose)
            .add_filter(AddressPresenceFilter)
            .add_filter(RequiredFeaturesFilter)
            .add_filter(StakeMinimumFilter)
            .add_filter(LocationProximityFilter::new(self.config.proximity_threshold))
    }

    fn scoring_pipeline(&self) -> ScoringPipeline {
        ScoringPipeline::new(self.config.weights)
            .verbose(self.config.verbose)
            .add_scorer(StakeScorer)
            .add_scorer(FeatureScorer)
            .add_scorer(LocationScorer)
    }

    fn pair(
        &self,
        providers: &[Provider],
        policy: Option<&ConsumerPolicy>,
    ) -> Result<Vec<PairingScore>> {
        let start_time = Instant::now();
        let policy = validate_request(providers, policy)?;

        let outcome = self.filter_pipeline().apply(&self.pool, providers, &policy);
        if outcome.survivors.is_empty() {
            info!("No provider out of {} survived filtering", providers.len());
            return Err(PairingError::NoSurvivors {
                evaluated: providers.len(),
            });
        }

        // The filter phase has joined; nothing can fold into the builder now
        let survivors = outcome.survivors;
        let context = outcome.context.finalize().ok_or_else(|| {
            PairingError::Internal("scoring context missing after filter phase".to_string())
        })?;
        debug!(
            "Scoring context: stake {}..={}, max features {}",
            context.min_stake(),
            context.max_stake(),
            context.max_feature_count()
        );

        let scores = self
            .scoring_pipeline()
            .apply(&self.pool, &survivors, &policy, &context);
        if scores.is_empty() {
            return Err(PairingError::Internal(format!(
                "every scoring task failed for {} survivors",
                survivors.len()
            )));
        }

        let ranked = Ranker::new(self.config.top_k).rank(scores);
        info!(
            "Paired {} of {} providers ({} survivors) in {:.2?}",
            ranked.len(),
            providers.len(),
            survivors.len(),
            start_time.elapsed()
        );
        Ok(ranked)
    }
}

/// Check the request and return a normalized copy of the policy.
fn validate_request(
    providers: &[Provider],
    policy: Option<&ConsumerPolicy>,
) -> Result<ConsumerPolicy> {
    if providers.is_empty() {
        return Err(PairingError::InvalidInput(
            "provider list is empty".to_string(),
        ));
    }
    let policy = policy.ok_or_else(|| PairingError::InvalidInput("policy is absent".to_string()))?;
    if policy.min_stake < 0 {
        return Err(PairingError::InvalidInput(format!(
            "consumer min_stake is negative: {}",
            policy.min_stake
        )));
    }
    Ok(policy.normalized())
}

/// Run `request`, turning a panic into `PairingError::Internal`.
fn guarded<T>(request: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(request)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        error!("Recovered from panic in pairing request: {}", message);
        Err(PairingError::Internal(message))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn build_test_orchestrator() -> PairingOrchestrator {
        let config = PairingConfig {
            max_concurrency: Some(4),
            ..PairingConfig::default()
        };
        PairingOrchestrator::new(config).expect("Failed to create orchestrator")
    }

    fn open_policy() -> ConsumerPolicy {
        ConsumerPolicy::new(None, Vec::<String>::new(), 0)
    }

    // ============================================================================
    // Unit Tests: validate_request
    // ============================================================================

    #[test]
    fn test_validate_rejects_empty_provider_list() {
        let result = validate_request(&[], Some(&open_policy()));
        assert!(matches!(result, Err(PairingError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_absent_policy() {
        let providers = vec![Provider::new("1", 1, "", Vec::<String>::new())];
        let result = validate_request(&providers, None);
        assert!(matches!(result, Err(PairingError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_negative_min_stake() {
        let providers = vec![Provider::new("1", 1, "", Vec::<String>::new())];
        let policy = ConsumerPolicy::new(None, Vec::<String>::new(), -1);
        let result = validate_request(&providers, Some(&policy));
        assert!(matches!(result, Err(PairingError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_normalizes_a_copy() {
        let providers = vec![Provider::new("1", 1, "", Vec::<String>::new())];
        let policy = ConsumerPolicy::new(None, ["rpc ", "rest", "rpc"], 0);

        let normalized = validate_request(&providers, Some(&policy)).unwrap();
        assert_eq!(normalized.required_features, vec!["rest", "rpc"]);
        assert_eq!(policy.required_features, vec!["rpc ", "rest", "rpc"]);
    }

    // ============================================================================
    // Unit Tests: guarded
    // ============================================================================

    #[test]
    fn test_guarded_converts_panic_to_internal_error() {
        let result: Result<()> = guarded(|| panic!("orchestration fault"));
        assert_eq!(
            result,
            Err(PairingError::Internal("orchestration fault".to_string()))
        );
    }

    #[test]
    fn test_guarded_passes_results_through() {
        assert_eq!(guarded(|| Ok(7)), Ok(7));
        assert_eq!(
            guarded::<()>(|| Err(PairingError::NoSurvivors { evaluated: 2 })),
            Err(PairingError::NoSurvivors { evaluated: 2 })
        );
    }

    // ============================================================================
    // Unit Tests: construction
    // ============================================================================

    #[test]
    fn test_orchestrator_construction() {
        let orchestrator = build_test_orchestrator();
        assert_eq!(orchestrator.concurrency(), 4);
        assert_eq!(orchestrator.config().top_k, 5);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PairingConfig {
            top_k: 0,
            ..PairingConfig::default()
        };
        assert!(matches!(
            PairingOrchestrator::new(config),
            Err(PairingError::Config(_))
        ));
    }

    #[test]
    fn test_filter_pipeline_order() {
        let orchestrator = build_test_orchestrator();
        assert_eq!(
            orchestrator.filter_pipeline().filter_names(),
            vec![
                "AddressPresenceFilter",
                "RequiredFeaturesFilter",
                "StakeMinimumFilter",
                "LocationProximityFilter",
            ]
        );
    }

    #[test]
    fn test_filter_providers_returns_survivors() {
        let orchestrator = build_test_orchestrator();
        let providers = vec![
            Provider::new("1", 10, "EU", ["rpc"]),
            Provider::new("", 10, "EU", ["rpc"]),
        ];

        let survivors = orchestrator
            .filter_providers(&providers, Some(&open_policy()))
            .unwrap();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].address, "1");
    }
}
