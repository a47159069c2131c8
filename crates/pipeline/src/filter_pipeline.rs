//! The FilterPipeline runs the filter phase of a pairing request.
//!
//! Every provider is normalized and checked by its own worker task. Workers
//! share three pieces of state, each behind a mutex: the set of addresses
//! seen so far, the survivor list and the scoring context accumulator.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use model::{Address, ConsumerPolicy, Provider};
use rayon::ThreadPool;
use tracing::{info, warn};

use crate::context::ScoringContextBuilder;
use crate::task::{into_inner, lock};
use crate::traits::Filter;

/// Result of the filter phase.
///
/// Survivors arrive in completion order, which is not deterministic.
#[derive(Debug)]
pub struct FilterOutcome {
    /// Normalized copies of the providers that passed every filter
    pub survivors: Vec<Arc<Provider>>,
    /// Statistics over `survivors`, ready to be finalized
    pub context: ScoringContextBuilder,
    /// Addresses seen more than once, one entry per repeat
    pub duplicates: Vec<Address>,
}

/// Chains filters and applies them to each provider concurrently.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AddressPresenceFilter)
///     .add_filter(StakeMinimumFilter);
///
/// let outcome = pipeline.apply(&pool, &providers, &policy);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
    verbose: bool,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            verbose: false,
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// Filters run in the order they were added.
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Log each rejection with the filter and provider involved.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Check a normalized provider against every filter in order.
    ///
    /// Stops at the first rejection.
    pub fn passes(&self, provider: &Provider, policy: &ConsumerPolicy) -> bool {
        match self.filters.iter().find(|filter| !filter.apply(provider, policy)) {
            Some(filter) => {
                if self.verbose {
                    info!(
                        "Provider {} filtered out by {}",
                        provider.address,
                        filter.name()
                    );
                }
                false
            }
            None => true,
        }
    }

    /// Run the filter phase.
    ///
    /// ## Algorithm
    /// One task per provider on `pool`:
    /// 1. Record the address, warning on duplicates (they are kept)
    /// 2. Normalize a copy of the provider
    /// 3. Apply the filters, stopping at the first rejection
    /// 4. Fold survivors into the context builder and the survivor list
    ///
    /// Returns only after every task has finished. `policy` must already be
    /// normalized.
    pub fn apply(
        &self,
        pool: &ThreadPool,
        providers: &[Provider],
        policy: &ConsumerPolicy,
    ) -> FilterOutcome {
        let seen: Mutex<HashSet<&str>> = Mutex::new(HashSet::with_capacity(providers.len()));
        let duplicates = Mutex::new(Vec::new());
        let survivors = Mutex::new(Vec::with_capacity(providers.len()));
        let context = ScoringContextBuilder::new();

        pool.scope(|scope| {
            for provider in providers {
                let (seen, duplicates, survivors, context) =
                    (&seen, &duplicates, &survivors, &context);
                scope.spawn(move |_| {
                    if !lock(seen).insert(provider.address.as_str()) {
                        warn!("Duplicate provider address detected: {}", provider.address);
                        lock(duplicates).push(provider.address.clone());
                    }

                    let normalized = provider.normalized();
                    if !self.passes(&normalized, policy) {
                        return;
                    }

                    context.observe(&normalized);
                    lock(survivors).push(Arc::new(normalized));
                });
            }
        });

        let outcome = FilterOutcome {
            survivors: into_inner(survivors),
            context,
            duplicates: into_inner(duplicates),
        };
        info!(
            "Filter phase complete: {} of {} providers survived ({} duplicate addresses)",
            outcome.survivors.len(),
            providers.len(),
            outcome.duplicates.len()
        );
        outcome
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
