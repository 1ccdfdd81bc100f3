//! Stub embedding provider for testing.
//!
//! Produces deterministic unit vectors derived from a content hash, so
//! the same text always embeds identically without touching the network.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::CoreResult;
use crate::traits::EmbeddingProvider;
use crate::types::EmbeddingVector;

/// Deterministic hash-seeded embedding provider.
///
/// # Example
///
/// ```
/// use quote_graph_core::stubs::StubEmbeddingProvider;
///
/// let provider = StubEmbeddingProvider::with_dimensions(8);
/// ```
pub struct StubEmbeddingProvider {
    dimensions: usize,
}

impl Default for StubEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StubEmbeddingProvider {
    /// Create a stub provider with the default 1536 dimensions.
    pub fn new() -> Self {
        Self { dimensions: 1536 }
    }

    /// Create a stub provider with custom dimensions.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn generate(&self, content: &str) -> EmbeddingVector {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        let mut rng = ChaCha8Rng::seed_from_u64(hasher.finish());

        let mut embedding: Vec<f32> =
            (0..self.dimensions).map(|_| rng.gen::<f32>() * 2.0 - 1.0).collect();

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in embedding.iter_mut() {
                *x /= norm;
            }
        }
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddingProvider {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> CoreResult<EmbeddingVector> {
        Ok(self.generate(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> CoreResult<Vec<EmbeddingVector>> {
        Ok(texts.iter().map(|t| self.generate(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embeddings_are_deterministic() {
        let provider = StubEmbeddingProvider::with_dimensions(16);
        let a = provider.embed("the same text").await.unwrap();
        let b = provider.embed("the same text").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_different_texts_differ() {
        let provider = StubEmbeddingProvider::with_dimensions(16);
        let a = provider.embed("one").await.unwrap();
        let b = provider.embed("two").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_embeddings_are_unit_length() {
        let provider = StubEmbeddingProvider::with_dimensions(32);
        let v = provider.embed("norm check").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let provider = StubEmbeddingProvider::with_dimensions(8);
        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let batch = provider.embed_batch(&texts).await.unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], provider.embed("a").await.unwrap());
        assert_eq!(batch[2], provider.embed("c").await.unwrap());
    }
}
