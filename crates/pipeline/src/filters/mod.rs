//! Filter implementations for the pairing pipeline.
//!
//! This module contains the hard constraints that can be composed into a
//! FilterPipeline. The orchestrator applies them in the order listed here.

pub mod address_presence;
pub mod location_proximity;
pub mod required_features;
pub mod stake_minimum;

// Re-export for convenience
pub use address_presence::AddressPresenceFilter;
pub use location_proximity::LocationProximityFilter;
pub use required_features::RequiredFeaturesFilter;
pub use stake_minimum::StakeMinimumFilter;
