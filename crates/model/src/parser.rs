//! Loaders for provider and policy documents.
//!
//! Providers are a JSON array of objects:
//! `[{"address": "0x1", "stake": 150, "location": "EU", "features": ["rpc"]}]`
//!
//! A policy is a single object, or `null` for an absent policy:
//! `{"required_location": "EU", "required_features": ["rpc"], "min_stake": 100}`
//!
//! No validation happens here; the orchestrator owns input validation.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{LoadError, Result};
use crate::types::{ConsumerPolicy, Provider};

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_json(&content, path)
}

fn parse_json<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T> {
    serde_json::from_str(content).map_err(|source| LoadError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Load a list of providers.
pub fn load_providers(path: &Path) -> Result<Vec<Provider>> {
    load_json(path)
}

/// Load a consumer policy. `null` yields `None`.
pub fn load_policy(path: &Path) -> Result<Option<ConsumerPolicy>> {
    load_json(path)
}
