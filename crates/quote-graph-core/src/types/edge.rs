//! Directed similarity edge between two quotes.

use serde::{Deserialize, Serialize};

use super::QuoteId;

/// Directed similarity edge.
///
/// An edge from A to B records that B is among A's top-K nearest
/// neighbors; it does not imply an edge from B to A. The full edge set is
/// a derived artifact, fully replaced by each similarity rebuild.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimilarityEdge {
    /// Source quote id
    pub source: QuoteId,

    /// Target quote id
    pub target: QuoteId,

    /// Cosine similarity score [-1.0, 1.0]
    pub score: f32,
}

impl SimilarityEdge {
    /// Create a new edge. The score is clamped to the valid cosine range.
    pub fn new(source: QuoteId, target: QuoteId, score: f32) -> Self {
        Self {
            source,
            target,
            score: score.clamp(-1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_edge_creation() {
        let source = Uuid::new_v4();
        let target = Uuid::new_v4();
        let edge = SimilarityEdge::new(source, target, 0.87);

        assert_eq!(edge.source, source);
        assert_eq!(edge.target, target);
        assert_eq!(edge.score, 0.87);
    }

    #[test]
    fn test_score_clamping() {
        let source = Uuid::new_v4();
        let target = Uuid::new_v4();

        let high = SimilarityEdge::new(source, target, 1.0 + 1e-3);
        assert_eq!(high.score, 1.0);

        let low = SimilarityEdge::new(source, target, -1.5);
        assert_eq!(low.score, -1.0);
    }
}
