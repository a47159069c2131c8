//! Configuration of a pairing orchestrator.
//!
//! Weights, verbosity and concurrency are fixed when the orchestrator is
//! built, so concurrent requests on different orchestrators never observe
//! each other's settings.

use std::fs;
use std::path::Path;

use pipeline::ScoreWeights;
use serde::{Deserialize, Serialize};

use crate::error::{PairingError, Result};

/// Number of providers returned by a request
pub const DEFAULT_TOP_K: usize = 5;

/// Worker count used when the parallelism of the host is unknown
pub const FALLBACK_CONCURRENCY: usize = 10;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Two workers per available core, or `FALLBACK_CONCURRENCY`.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism().map_or(FALLBACK_CONCURRENCY, |n| n.get() * 2)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Weight of each scorer in the total score
    pub weights: ScoreWeights,
    /// Emit a diagnostic record for every rejection and component score
    pub verbose: bool,
    /// Length of the ranked short-list
    pub top_k: usize,
    /// Worker limit for each phase; `None` picks `default_concurrency()`
    pub max_concurrency: Option<usize>,
    /// Handed to the location filter for future distance checks
    pub proximity_threshold: f64,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            verbose: false,
            top_k: DEFAULT_TOP_K,
            max_concurrency: None,
            proximity_threshold: 0.0,
        }
    }
}

impl PairingConfig {
    /// Load a configuration document. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| PairingError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| PairingError::Config(format!("cannot parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        for (scorer, weight) in self.weights.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(PairingError::Config(format!(
                    "weight for {scorer} must be a non-negative number, got {weight}"
                )));
            }
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PairingError::Config(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }
        if self.top_k == 0 {
            return Err(PairingError::Config("top_k must be positive".to_string()));
        }
        if self.max_concurrency == Some(0) {
            return Err(PairingError::Config(
                "max_concurrency must be positive".to_string(),
            ));
        }
        if !self.proximity_threshold.is_finite() {
            return Err(PairingError::Config(
                "proximity_threshold must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective worker limit for each phase.
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(default_concurrency)
    }
}
