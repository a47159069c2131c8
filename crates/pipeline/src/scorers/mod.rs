//! Scorer implementations and their weight table.
//!
//! Each scorer returns a component in `[0, 1]`. The total score of a
//! provider is the weighted sum of its components.

pub mod feature;
pub mod location;
pub mod stake;
pub mod weights;

pub use feature::FeatureScorer;
pub use location::LocationScorer;
pub use stake::StakeScorer;
pub use weights::ScoreWeights;
