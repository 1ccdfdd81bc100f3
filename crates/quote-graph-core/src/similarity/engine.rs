//! Similarity engine: top-K neighbor queries and full graph rebuild.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::traits::QuoteStore;
use crate::types::{QuoteId, SimilarityEdge};

use super::top_k_similar;

/// Outcome of a full similarity rebuild.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecomputeReport {
    /// Quotes with embeddings that were compared
    pub quotes_processed: usize,
    /// Edges written; at most `quotes_processed * top_k`
    pub edges_created: usize,
    /// Quotes skipped because they have no embedding
    pub quotes_skipped: usize,
    pub top_k: usize,
}

/// Computes the directed top-K similarity graph over the stored corpus.
///
/// A rebuild works from one embedding snapshot, so the edge set visible
/// after a completed call is internally consistent. Rebuilds are
/// idempotent given an unchanged corpus.
pub struct SimilarityEngine {
    store: Arc<dyn QuoteStore>,
}

impl SimilarityEngine {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self { store }
    }

    /// Recompute every quote's top-K neighbors and destructively replace
    /// the stored edge set.
    ///
    /// Quotes without embeddings are skipped and counted in the report
    /// rather than failing the pass.
    pub async fn recompute_all(&self, top_k: usize) -> CoreResult<RecomputeReport> {
        // One snapshot for the whole pass.
        let corpus = self.store.all_embeddings().await?;
        let total = self.store.count_quotes().await?;
        let quotes_skipped = total.saturating_sub(corpus.len());

        let mut edges: Vec<SimilarityEdge> = Vec::with_capacity(corpus.len() * top_k);
        for (id, vector) in &corpus {
            for (target, score) in top_k_similar(vector, &corpus, top_k, Some(*id)) {
                edges.push(SimilarityEdge::new(*id, target, score));
            }
        }

        self.store.replace_similarity_edges(&edges).await?;

        info!(
            quotes = corpus.len(),
            edges = edges.len(),
            skipped = quotes_skipped,
            top_k,
            "similarity graph rebuilt"
        );

        Ok(RecomputeReport {
            quotes_processed: corpus.len(),
            edges_created: edges.len(),
            quotes_skipped,
            top_k,
        })
    }

    /// Find the quotes most similar to one stored quote.
    ///
    /// Fails with `QuoteNotFound` when the quote does not exist and
    /// `EmbeddingMissing` when it exists but was never embedded.
    pub async fn find_similar_to(
        &self,
        id: QuoteId,
        top_k: usize,
    ) -> CoreResult<Vec<(QuoteId, f32)>> {
        let Some(target) = self.store.get_embedding(id).await? else {
            return if self.store.get_quote(id).await?.is_some() {
                Err(CoreError::EmbeddingMissing { id })
            } else {
                Err(CoreError::QuoteNotFound { id })
            };
        };

        let corpus = self.store.all_embeddings().await?;
        Ok(top_k_similar(&target, &corpus, top_k, Some(id)))
    }
}
