//! Filtering and scoring of provider candidates.
//!
//! This crate provides:
//! - Filter and Scorer traits with the standard implementations
//! - FilterPipeline: concurrent filter phase feeding the scoring context
//! - ScoringPipeline: concurrent weighted scoring of survivors
//!
//! ## Architecture
//! A request is processed in two strictly sequential phases:
//! 1. Filters reject providers that violate the consumer policy; survivors
//!    fold their stake and feature count into a `ScoringContextBuilder`
//! 2. Once every filter task has finished, the builder is finalized into an
//!    immutable `ScoringContext` and scorers run against it
//!
//! Both phases fan out one task per provider on a caller-supplied
//! `rayon::ThreadPool`, whose worker count bounds concurrency.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, ScoringPipeline, ScoreWeights};
//! use pipeline::filters::*;
//! use pipeline::scorers::*;
//!
//! let filters = FilterPipeline::new()
//!     .add_filter(AddressPresenceFilter)
//!     .add_filter(RequiredFeaturesFilter)
//!     .add_filter(StakeMinimumFilter)
//!     .add_filter(LocationProximityFilter::default());
//!
//! let outcome = filters.apply(&pool, &providers, &policy);
//! let context = outcome.context.finalize().expect("at least one survivor");
//!
//! let scoring = ScoringPipeline::new(ScoreWeights::default())
//!     .add_scorer(StakeScorer)
//!     .add_scorer(FeatureScorer)
//!     .add_scorer(LocationScorer);
//! let scores = scoring.apply(&pool, &outcome.survivors, &policy, &context);
//! ```

pub mod context;
pub mod filter_pipeline;
pub mod filters;
pub mod scorers;
pub mod scoring_pipeline;
pub mod task;
pub mod traits;

// Re-export main types
pub use context::{ScoringContext, ScoringContextBuilder};
pub use filter_pipeline::{FilterOutcome, FilterPipeline};
pub use scorers::ScoreWeights;
pub use scoring_pipeline::{PairingScore, ScoringPipeline};
pub use traits::{Filter, Scorer};
