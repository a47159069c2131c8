//! Filter to reject providers without a usable address.
//!
//! This is the first filter in the pipeline: a provider that cannot be
//! addressed can never be paired.

use crate::traits::Filter;
use model::{ConsumerPolicy, Provider};

/// Rejects providers whose address is empty or all whitespace.
pub struct AddressPresenceFilter;

impl Filter for AddressPresenceFilter {
    fn name(&self) -> &str {
        "AddressPresenceFilter"
    }

    fn apply(&self, provider: &Provider, _policy: &ConsumerPolicy) -> bool {
        !provider.address.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_presence_filter() {
        let policy = ConsumerPolicy::new(None, Vec::<String>::new(), 0);
        let filter = AddressPresenceFilter;

        let empty = Provider::new("", 10, "EU", ["rpc"]);
        let blank = Provider::new(" \t ", 10, "EU", ["rpc"]);
        let valid = Provider::new("abc", 10, "EU", ["rpc"]);

        assert!(!filter.apply(&empty, &policy));
        assert!(!filter.apply(&blank, &policy));
        assert!(filter.apply(&valid, &policy));
    }
}
