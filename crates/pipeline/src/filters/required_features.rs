//! Filter to ensure the provider offers every required feature.

use crate::traits::Filter;
use model::{ConsumerPolicy, Provider};

/// Keeps providers whose features are a superset of the policy's.
///
/// ## Algorithm
/// Both sides are normalized (sorted, deduplicated), so the subset test is a
/// single merge pass in O(n + m):
/// 1. Equal heads: the requirement is met, advance both
/// 2. Provider head smaller: skip the extra provider feature
/// 3. Required head smaller: it cannot appear later, reject
pub struct RequiredFeaturesFilter;

/// Whether every entry of `required` appears in `offered`.
///
/// Both slices must be sorted and free of duplicates.
pub fn is_sorted_subset(required: &[String], offered: &[String]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < required.len() && j < offered.len() {
        match required[i].cmp(&offered[j]) {
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Less => return false,
        }
    }
    i == required.len()
}

impl Filter for RequiredFeaturesFilter {
    fn name(&self) -> &str {
        "RequiredFeaturesFilter"
    }

    fn apply(&self, provider: &Provider, policy: &ConsumerPolicy) -> bool {
        if policy.required_features.is_empty() {
            return true;
        }
        is_sorted_subset(&policy.required_features, &provider.features)
    }
}
