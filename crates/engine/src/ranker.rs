//! Deterministic ranking of scored providers.

use std::cmp::Ordering;

use pipeline::PairingScore;

/// Sorts scores and keeps the best `top_k`.
///
/// ## Algorithm
/// Stable sort by total score descending, ties broken by ascending address.
/// The order is total, so the result never depends on the order in which
/// scoring tasks completed.
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    top_k: usize,
}

impl Ranker {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn rank(&self, mut scores: Vec<PairingScore>) -> Vec<PairingScore> {
        scores.sort_by(compare);
        scores.truncate(self.top_k);
        scores
    }
}

// NaN never outranks a real score
fn rank_key(total: f64) -> f64 {
    if total.is_nan() { f64::NEG_INFINITY } else { total }
}

/// Ordering used by the ranker: best first.
pub fn compare(a: &PairingScore, b: &PairingScore) -> Ordering {
    rank_key(b.total)
        .total_cmp(&rank_key(a.total))
        .then_with(|| a.provider.address.cmp(&b.provider.address))
}
