//! The ScoringPipeline runs the score phase of a pairing request.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use model::{ConsumerPolicy, Provider};
use rayon::ThreadPool;
use tracing::{info, warn};

use crate::context::ScoringContext;
use crate::scorers::ScoreWeights;
use crate::task::{into_inner, lock, panic_message};
use crate::traits::Scorer;

/// Weighted score of one provider, with its per-criterion breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct PairingScore {
    pub provider: Arc<Provider>,
    /// Weighted sum of `components`
    pub total: f64,
    /// Unweighted component score keyed by scorer name
    pub components: BTreeMap<String, f64>,
}

/// Applies a set of scorers to every survivor concurrently.
///
/// ## Failure isolation
/// A scorer that panics only costs its own provider: the task is abandoned,
/// a warning is logged and the provider receives no score. The phase itself
/// always completes.
pub struct ScoringPipeline {
    scorers: Vec<Box<dyn Scorer>>,
    weights: ScoreWeights,
    verbose: bool,
}

impl ScoringPipeline {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            scorers: Vec::new(),
            weights,
            verbose: false,
        }
    }

    /// Add a scorer to the pipeline (builder pattern).
    pub fn add_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorers.push(Box::new(scorer));
        self
    }

    /// Log every component and total score.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Score a single provider with every scorer.
    pub fn score_one(
        &self,
        provider: &Arc<Provider>,
        policy: &ConsumerPolicy,
        context: &ScoringContext,
    ) -> PairingScore {
        let mut components = BTreeMap::new();
        let mut total = 0.0;
        for scorer in &self.scorers {
            let value = scorer.score(provider, policy, context);
            if self.verbose {
                info!(
                    "Provider {} {} score: {:.3}",
                    provider.address,
                    scorer.name(),
                    value
                );
            }
            total += self.weights.weight(scorer.name()) * value;
            components.insert(scorer.name().to_string(), value);
        }
        if self.verbose {
            info!("Provider {} final score: {:.3}", provider.address, total);
        }

        PairingScore {
            provider: provider.clone(),
            total,
            components,
        }
    }

    /// Run the score phase.
    ///
    /// One task per survivor on `pool`; returns after every task has finished.
    /// The output is unordered and may be shorter than `survivors` when a
    /// scoring task failed.
    pub fn apply(
        &self,
        pool: &ThreadPool,
        survivors: &[Arc<Provider>],
        policy: &ConsumerPolicy,
        context: &ScoringContext,
    ) -> Vec<PairingScore> {
        let scores = Mutex::new(Vec::with_capacity(survivors.len()));

        pool.scope(|scope| {
            for provider in survivors {
                let scores = &scores;
                scope.spawn(move |_| {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        self.score_one(provider, policy, context)
                    }));
                    match result {
                        Ok(score) => lock(scores).push(score),
                        Err(payload) => warn!(
                            "Recovered from panic in scoring provider {}: {}",
                            provider.address,
                            panic_message(payload.as_ref())
                        ),
                    }
                });
            }
        });

        let scores = into_inner(scores);
        if scores.len() != survivors.len() {
            warn!(
                "Score phase dropped {} of {} providers",
                survivors.len() - scores.len(),
                survivors.len()
            );
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorers::{FeatureScorer, LocationScorer, StakeScorer};

    fn pool() -> ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap()
    }

    fn standard() -> ScoringPipeline {
        ScoringPipeline::new(ScoreWeights::default())
            .add_scorer(StakeScorer)
            .add_scorer(FeatureScorer)
            .add_scorer(LocationScorer)
    }

    #[test]
    fn test_total_is_weighted_sum_of_components() {
        let policy = ConsumerPolicy::new(Some("EU"), ["rest", "rpc"], 0);
        let context = ScoringContext::new(100, 200, 4);
        let provider = Arc::new(Provider::new("1", 150, "US", ["grpc", "rest", "rpc"]));

        let score = standard().score_one(&provider, &policy, &context);

        assert_eq!(score.components["stake"], 0.5);
        assert_eq!(score.components["feature"], 0.75);
        assert_eq!(score.components["location"], 0.5);
        let expected = 0.4 * 0.5 + 0.4 * 0.75 + 0.2 * 0.5;
        assert!((score.total - expected).abs() < 1e-12);
    }

    #[test]
    fn test_scores_every_survivor() {
        let policy = ConsumerPolicy::new(None, Vec::<String>::new(), 0);
        let context = ScoringContext::new(0, 99, 1);
        let survivors: Vec<Arc<Provider>> = (0..100)
            .map(|i| Arc::new(Provider::new(format!("p{i}"), i, "", ["rpc"])))
            .collect();

        let scores = standard().apply(&pool(), &survivors, &policy, &context);
        assert_eq!(scores.len(), 100);
        assert!(scores.iter().all(|s| s.total >= 0.0 && s.total <= 1.0 + 1e-9));
    }

    struct PanicsOn(&'static str);

    impl Scorer for PanicsOn {
        fn name(&self) -> &str {
            "panics"
        }

        fn score(&self, provider: &Provider, _policy: &ConsumerPolicy, _context: &ScoringContext) -> f64 {
            if provider.address == self.0 {
                panic!("scorer failure for {}", provider.address);
            }
            0.0
        }
    }

    #[test]
    fn test_panicking_task_only_drops_its_provider() {
        let pipeline = standard().add_scorer(PanicsOn("bad"));
        let policy = ConsumerPolicy::new(None, Vec::<String>::new(), 0);
        let context = ScoringContext::new(1, 3, 0);
        let survivors = vec![
            Arc::new(Provider::new("good", 1, "", Vec::<String>::new())),
            Arc::new(Provider::new("bad", 2, "", Vec::<String>::new())),
            Arc::new(Provider::new("fine", 3, "", Vec::<String>::new())),
        ];

        let scores = pipeline.apply(&pool(), &survivors, &policy, &context);

        assert_eq!(scores.len(), 2);
        assert!(scores.iter().all(|s| s.provider.address != "bad"));
        // Unknown scorer names carry no weight but are still reported
        assert!(scores.iter().all(|s| s.components.contains_key("panics")));
    }
}
