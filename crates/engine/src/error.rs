//! Error taxonomy of a pairing request.

use thiserror::Error;

/// Why a pairing request produced no result.
///
/// Every failure is an ordinary return value; a request never aborts the
/// host process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PairingError {
    /// The request was rejected before any work started
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Every provider was rejected by at least one filter
    #[error("no matching providers after filtering ({evaluated} evaluated)")]
    NoSurvivors { evaluated: usize },

    /// An unexpected fault was trapped at the orchestrator boundary
    #[error("internal error occurred: {0}")]
    Internal(String),

    /// The orchestrator could not be built from its configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PairingError>;
