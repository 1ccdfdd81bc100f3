//! Exact top-K cosine similarity.
//!
//! Brute-force by design: O(n) per query, O(n²) per full rebuild. Corpus
//! sizes here stay well below the point where exactness needs an
//! approximate index, and the engine contract would let one be swapped in
//! behind `SimilarityEngine` without touching callers.

mod engine;

pub use engine::{RecomputeReport, SimilarityEngine};

use std::cmp::Ordering;

use crate::types::{EmbeddingVector, QuoteId};

/// Compute cosine similarity between two embedding vectors.
///
/// Returns 0.0 for a length mismatch or when either norm is zero, so it
/// never divides by zero or panics.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

/// Find the top `k` most similar corpus entries to `target`.
///
/// Scores are non-increasing; equal scores keep corpus order (the sort is
/// stable), which matters because duplicate texts produce exact ties.
/// `exclude` (normally the target's own id) never appears in the result.
pub fn top_k_similar(
    target: &[f32],
    corpus: &[(QuoteId, EmbeddingVector)],
    k: usize,
    exclude: Option<QuoteId>,
) -> Vec<(QuoteId, f32)> {
    let mut scored: Vec<(QuoteId, f32)> = corpus
        .iter()
        .filter(|(id, _)| Some(*id) != exclude)
        .map(|(id, vector)| (*id, cosine_similarity(target, vector)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.3, -0.7, 0.2];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch_is_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_range() {
        let a = vec![0.9, -0.4, 1.3];
        let b = vec![-2.0, 0.5, 0.7];
        let sim = cosine_similarity(&a, &b);
        assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn test_top_k_ordering_and_exclusion() {
        // Three-record scenario: [1,0] against [0.9,0.1] and [-1,0].
        let target_id = Uuid::new_v4();
        let close_id = Uuid::new_v4();
        let far_id = Uuid::new_v4();
        let corpus = vec![
            (target_id, vec![1.0, 0.0]),
            (close_id, vec![0.9, 0.1]),
            (far_id, vec![-1.0, 0.0]),
        ];

        let result = top_k_similar(&[1.0, 0.0], &corpus, 2, Some(target_id));
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].0, close_id);
        assert_eq!(result[1].0, far_id);
        assert!(result[0].1 > 0.9);
        assert!((result[1].1 + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_top_k_truncates_to_k() {
        let corpus: Vec<_> = (0..10).map(|_| (Uuid::new_v4(), vec![1.0, 0.0])).collect();
        let result = top_k_similar(&[1.0, 0.0], &corpus, 3, None);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_top_k_ties_keep_corpus_order() {
        // Duplicate vectors score identically; the stable sort must keep
        // corpus order among them.
        let ids: Vec<QuoteId> = (0..4).map(|_| Uuid::new_v4()).collect();
        let corpus: Vec<_> = ids.iter().map(|id| (*id, vec![0.5, 0.5])).collect();

        let result = top_k_similar(&[1.0, 1.0], &corpus, 4, None);
        let result_ids: Vec<QuoteId> = result.iter().map(|(id, _)| *id).collect();
        assert_eq!(result_ids, ids);
    }

    #[test]
    fn test_top_k_never_returns_excluded_id() {
        let excluded = Uuid::new_v4();
        let corpus = vec![(excluded, vec![1.0, 0.0]), (Uuid::new_v4(), vec![0.5, 0.5])];
        let result = top_k_similar(&[1.0, 0.0], &corpus, 5, Some(excluded));
        assert!(result.iter().all(|(id, _)| *id != excluded));
    }
}
