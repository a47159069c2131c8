//! Core domain types for pairing.
//!
//! `Provider` and `ConsumerPolicy` arrive per request and are read-only to the
//! engine. Normalization always produces a copy.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize_features;

/// On-chain address of a provider. Must be unique and non-blank to be usable.
pub type Address = String;

/// Amount staked by a provider, or the minimum a consumer demands.
pub type Stake = i64;

/// A candidate service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub address: Address,
    #[serde(default)]
    pub stake: Stake,
    /// Coarse region label (e.g. "EU"), empty when unknown
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Provider {
    pub fn new<I, S>(address: impl Into<String>, stake: Stake, location: impl Into<String>, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            address: address.into(),
            stake,
            location: location.into(),
            features: features.into_iter().map(Into::into).collect(),
        }
    }

    /// Copy of this provider with its feature list normalized.
    pub fn normalized(&self) -> Self {
        Self {
            address: self.address.clone(),
            stake: self.stake,
            location: self.location.clone(),
            features: normalize_features(&self.features),
        }
    }

    pub fn has_location(&self) -> bool {
        !self.location.trim().is_empty()
    }
}

/// The consumer's hard constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerPolicy {
    #[serde(default)]
    pub required_location: Option<String>,
    #[serde(default)]
    pub required_features: Vec<String>,
    #[serde(default)]
    pub min_stake: Stake,
}

impl ConsumerPolicy {
    pub fn new<I, S>(required_location: Option<&str>, required_features: I, min_stake: Stake) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_location: required_location.map(str::to_string),
            required_features: required_features.into_iter().map(Into::into).collect(),
            min_stake,
        }
    }

    /// Copy of this policy with its required features normalized.
    pub fn normalized(&self) -> Self {
        Self {
            required_location: self.required_location.clone(),
            required_features: normalize_features(&self.required_features),
            min_stake: self.min_stake,
        }
    }

    /// The required location, treating a blank label as no requirement.
    pub fn required_location(&self) -> Option<&str> {
        self.required_location
            .as_deref()
            .filter(|location| !location.trim().is_empty())
    }
}
