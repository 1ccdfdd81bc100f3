//! Embedding provider trait for the external embedding service.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::EmbeddingVector;

/// External embedding provider abstraction.
///
/// Implementations must return vectors of exactly `dimensions()` floats,
/// in input order. Batch calls are all-or-nothing: a failure anywhere in
/// a batch surfaces as an error with no partial results, so callers can
/// commit per completed batch.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Fixed output dimension of this provider.
    fn dimensions(&self) -> usize;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> CoreResult<EmbeddingVector>;

    /// Embed multiple texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> CoreResult<Vec<EmbeddingVector>>;
}
