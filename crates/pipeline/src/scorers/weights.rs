//! Per-criterion weights.

use serde::{Deserialize, Serialize};

use super::{FeatureScorer, LocationScorer, StakeScorer};

/// Weight of each scorer in the total score, keyed by scorer name.
///
/// The default table sums to 1.0 so totals stay in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub stake: f64,
    pub feature: f64,
    pub location: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            stake: 0.4,
            feature: 0.4,
            location: 0.2,
        }
    }
}

impl ScoreWeights {
    /// Weight for the scorer named `scorer`; unknown scorers weigh nothing.
    pub fn weight(&self, scorer: &str) -> f64 {
        match scorer {
            StakeScorer::NAME => self.stake,
            FeatureScorer::NAME => self.feature,
            LocationScorer::NAME => self.location,
            _ => 0.0,
        }
    }

    pub fn sum(&self) -> f64 {
        self.stake + self.feature + self.location
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            (StakeScorer::NAME, self.stake),
            (FeatureScorer::NAME, self.feature),
            (LocationScorer::NAME, self.location),
        ]
        .into_iter()
    }
}
