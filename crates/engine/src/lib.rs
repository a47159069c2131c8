//! Engine crate for provider pairing.
//!
//! This crate contains the orchestrator that turns a provider set and a
//! consumer policy into a ranked short-list, plus its configuration, error
//! taxonomy and ranking step.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod ranker;

pub use config::PairingConfig;
pub use error::{PairingError, Result};
pub use orchestrator::PairingOrchestrator;
pub use ranker::Ranker;

pub use model::{ConsumerPolicy, Provider};
pub use pipeline::{PairingScore, ScoreWeights};
