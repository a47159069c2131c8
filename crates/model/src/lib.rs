//! # Model Crate
//!
//! Domain types shared by the pairing engine.
//!
//! ## Main Components
//!
//! - **types**: `Provider` and `ConsumerPolicy`
//! - **normalize**: canonical form for feature lists
//! - **parser**: load providers and policies from JSON documents
//! - **error**: error types for loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use model::{parser, normalize_features};
//! use std::path::Path;
//!
//! let providers = parser::load_providers(Path::new("providers.json"))?;
//! let policy = parser::load_policy(Path::new("policy.json"))?;
//!
//! let required = normalize_features(&policy.required_features);
//! ```

pub mod error;
pub mod normalize;
pub mod parser;
pub mod types;

pub use error::{LoadError, Result};
pub use normalize::normalize_features;
pub use types::{Address, ConsumerPolicy, Provider, Stake};
