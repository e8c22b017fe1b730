//! Score fusion and cross-shard merging.

use std::cmp::Ordering;

use tessera_core::constants::{DENSE_WEIGHT, THEME_WEIGHT};
use tessera_core::models::RankedPassage;

/// Weighted linear fusion of the two similarity signals.
///
/// Dense similarity is the primary relevance signal; theme similarity
/// is a secondary re-rank nudge. The 90/10 split is a fixed design
/// constant.
pub fn fuse_scores(dense: f32, theme: f32) -> f32 {
    DENSE_WEIGHT * dense + THEME_WEIGHT * theme
}

/// Sort concatenated per-shard results best-first and keep `top_k`.
///
/// The sort is stable, so equal scores keep their shard/input order.
/// Duplicate texts are not deduplicated.
pub fn merge_and_truncate(
    mut results: Vec<RankedPassage>,
    top_k: usize,
) -> Vec<RankedPassage> {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results.truncate(top_k);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fusion_matches_reference_values() {
        // Dense [0.9, 0.5, 0.1] and theme [0.2, 0.9, 0.0] fuse to
        // [0.83, 0.54, 0.09].
        assert!((fuse_scores(0.9, 0.2) - 0.83).abs() < 1e-6);
        assert!((fuse_scores(0.5, 0.9) - 0.54).abs() < 1e-6);
        assert!((fuse_scores(0.1, 0.0) - 0.09).abs() < 1e-6);
    }

    #[test]
    fn fusion_weights_sum_to_one() {
        assert!((DENSE_WEIGHT + THEME_WEIGHT - 1.0).abs() < 1e-6);
    }

    #[test]
    fn merge_sorts_descending_and_truncates() {
        let results = vec![
            RankedPassage::new("low", 0.1),
            RankedPassage::new("high", 0.9),
            RankedPassage::new("mid", 0.5),
        ];
        let merged = merge_and_truncate(results, 2);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "high");
        assert_eq!(merged[1].text, "mid");
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let results = vec![
            RankedPassage::new("first shard", 0.5),
            RankedPassage::new("second shard", 0.5),
            RankedPassage::new("third shard", 0.5),
        ];
        let merged = merge_and_truncate(results, 3);
        assert_eq!(merged[0].text, "first shard");
        assert_eq!(merged[1].text, "second shard");
        assert_eq!(merged[2].text, "third shard");
    }

    #[test]
    fn truncation_never_exceeds_top_k() {
        let results = vec![RankedPassage::new("only", 1.0)];
        assert_eq!(merge_and_truncate(results, 10).len(), 1);
        assert!(merge_and_truncate(Vec::new(), 10).is_empty());
    }
}
