//! Canonical form for feature lists.

use std::collections::BTreeSet;

/// Trim every entry, drop blanks, deduplicate and sort lexicographically.
///
/// Both provider features and policy requirements go through this, so the
/// required-features filter can assume two sorted, duplicate-free sequences.
/// Comparison is case-sensitive: "REST" and "rest" are different features.
pub fn normalize_features<S: AsRef<str>>(features: &[S]) -> Vec<String> {
    features
        .iter()
        .map(|feature| feature.as_ref().trim())
        .filter(|feature| !feature.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_dedups_and_sorts() {
        let input = ["  rpc", "REST", "rpc", "rest ", "", "REST"];
        assert_eq!(normalize_features(&input), vec!["REST", "rest", "rpc"]);
    }

    #[test]
    fn test_drops_whitespace_only_entries() {
        let input = ["   ", "\t", "\n", "grpc"];
        assert_eq!(normalize_features(&input), vec!["grpc"]);
    }

    #[test]
    fn test_empty_input() {
        let input: [&str; 0] = [];
        assert!(normalize_features(&input).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let input = ["ws", " grpc", "rest", "grpc ", "ws"];
        let once = normalize_features(&input);
        let twice = normalize_features(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_order_independent() {
        let a = normalize_features(&["rpc", "grpc", "rest"]);
        let b = normalize_features(&["rest", "rpc", "grpc", "rpc"]);
        assert_eq!(a, b);
    }
}
