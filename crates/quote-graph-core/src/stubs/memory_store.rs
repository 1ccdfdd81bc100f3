//! In-memory quote store for tests and offline development.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::traits::{QuoteFilter, QuoteStore};
use crate::types::{
    Author, AuthorId, EmbeddingVector, Projection, Quote, QuoteId, SimilarityEdge,
};

#[derive(Default)]
struct Inner {
    authors: HashMap<AuthorId, Author>,
    authors_by_name: HashMap<String, AuthorId>,
    quotes: HashMap<QuoteId, Quote>,
    /// Insertion order; keeps snapshots and listings deterministic.
    order: Vec<QuoteId>,
    embeddings: HashMap<QuoteId, EmbeddingVector>,
    dimensions: Option<usize>,
    edges: Vec<SimilarityEdge>,
    clusters: HashMap<QuoteId, u32>,
    projections: HashMap<QuoteId, (f32, f32)>,
}

/// Thread-safe in-memory implementation of `QuoteStore`.
#[derive(Default)]
pub struct InMemoryQuoteStore {
    inner: RwLock<Inner>,
}

impl InMemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn join_derived(inner: &Inner, mut quote: Quote) -> Quote {
        quote.cluster = inner.clusters.get(&quote.id).copied();
        quote.projection = inner
            .projections
            .get(&quote.id)
            .map(|&(x, y)| Projection { x, y });
        quote
    }
}

#[async_trait]
impl QuoteStore for InMemoryQuoteStore {
    async fn upsert_author(
        &self,
        name: &str,
        bio: Option<&str>,
        image_url: Option<&str>,
    ) -> CoreResult<Author> {
        let mut inner = self.inner.write();
        let existing = inner.authors_by_name.get(name).copied();
        if let Some(id) = existing {
            let author = inner.authors.get_mut(&id).ok_or(CoreError::AuthorNotFound { id })?;
            if let Some(bio) = bio {
                author.bio = Some(bio.to_string());
            }
            if let Some(image_url) = image_url {
                author.image_url = Some(image_url.to_string());
            }
            return Ok(author.clone());
        }

        let mut author = Author::new(name);
        author.bio = bio.map(String::from);
        author.image_url = image_url.map(String::from);
        inner.authors_by_name.insert(name.to_string(), author.id);
        inner.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn get_author(&self, id: AuthorId) -> CoreResult<Option<Author>> {
        Ok(self.inner.read().authors.get(&id).cloned())
    }

    async fn find_author_by_name(&self, name: &str) -> CoreResult<Option<Author>> {
        let inner = self.inner.read();
        Ok(inner
            .authors_by_name
            .get(name)
            .and_then(|id| inner.authors.get(id))
            .cloned())
    }

    async fn list_authors(&self) -> CoreResult<Vec<Author>> {
        let mut authors: Vec<Author> = self.inner.read().authors.values().cloned().collect();
        authors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(authors)
    }

    async fn put_quote(&self, quote: &Quote) -> CoreResult<()> {
        let mut inner = self.inner.write();
        let mut stored = quote.clone();
        // Derived attributes are owned by the store.
        stored.cluster = None;
        stored.projection = None;
        if !inner.quotes.contains_key(&stored.id) {
            inner.order.push(stored.id);
        }
        inner.quotes.insert(stored.id, stored);
        Ok(())
    }

    async fn get_quote(&self, id: QuoteId) -> CoreResult<Option<Quote>> {
        let inner = self.inner.read();
        Ok(inner
            .quotes
            .get(&id)
            .cloned()
            .map(|q| Self::join_derived(&inner, q)))
    }

    async fn list_quotes(&self, filter: QuoteFilter) -> CoreResult<Vec<Quote>> {
        let inner = self.inner.read();
        let mut quotes: Vec<Quote> = inner
            .order
            .iter()
            .filter_map(|id| inner.quotes.get(id))
            .cloned()
            .map(|q| Self::join_derived(&inner, q))
            .filter(|q| filter.author_id.map_or(true, |a| q.author_id == a))
            .filter(|q| filter.cluster.map_or(true, |c| q.cluster == Some(c)))
            .collect();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            quotes.truncate(limit);
        }
        Ok(quotes)
    }

    async fn delete_quote(&self, id: QuoteId) -> CoreResult<bool> {
        let mut inner = self.inner.write();
        if inner.quotes.remove(&id).is_none() {
            return Ok(false);
        }
        inner.order.retain(|&q| q != id);
        inner.embeddings.remove(&id);
        inner.clusters.remove(&id);
        inner.projections.remove(&id);
        inner.edges.retain(|e| e.source != id && e.target != id);
        Ok(true)
    }

    async fn count_quotes(&self) -> CoreResult<usize> {
        Ok(self.inner.read().quotes.len())
    }

    async fn put_embedding(&self, id: QuoteId, vector: &[f32]) -> CoreResult<()> {
        let mut inner = self.inner.write();
        match inner.dimensions {
            Some(expected) if expected != vector.len() => {
                return Err(CoreError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
            None => inner.dimensions = Some(vector.len()),
            _ => {}
        }
        inner.embeddings.insert(id, vector.to_vec());
        Ok(())
    }

    async fn get_embedding(&self, id: QuoteId) -> CoreResult<Option<EmbeddingVector>> {
        Ok(self.inner.read().embeddings.get(&id).cloned())
    }

    async fn all_embeddings(&self) -> CoreResult<Vec<(QuoteId, EmbeddingVector)>> {
        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.embeddings.get(id).map(|v| (*id, v.clone())))
            .collect())
    }

    async fn replace_similarity_edges(&self, edges: &[SimilarityEdge]) -> CoreResult<()> {
        self.inner.write().edges = edges.to_vec();
        Ok(())
    }

    async fn similarity_edges(&self) -> CoreResult<Vec<SimilarityEdge>> {
        Ok(self.inner.read().edges.clone())
    }

    async fn apply_cluster_assignments(
        &self,
        assignments: &HashMap<QuoteId, u32>,
    ) -> CoreResult<()> {
        self.inner.write().clusters = assignments.clone();
        Ok(())
    }

    async fn cluster_assignments(&self) -> CoreResult<HashMap<QuoteId, u32>> {
        Ok(self.inner.read().clusters.clone())
    }

    async fn apply_projections(&self, coords: &HashMap<QuoteId, (f32, f32)>) -> CoreResult<()> {
        self.inner.write().projections = coords.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_author_is_keyed_by_name() {
        let store = InMemoryQuoteStore::new();
        let first = store.upsert_author("Seneca", None, None).await.unwrap();
        let second = store
            .upsert_author("Seneca", Some("Stoic philosopher"), None)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.bio.as_deref(), Some("Stoic philosopher"));
        assert_eq!(store.list_authors().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_keeps_existing_optional_fields() {
        let store = InMemoryQuoteStore::new();
        store
            .upsert_author("Seneca", Some("bio"), Some("http://img"))
            .await
            .unwrap();
        let updated = store.upsert_author("Seneca", None, None).await.unwrap();
        assert_eq!(updated.bio.as_deref(), Some("bio"));
        assert_eq!(updated.image_url.as_deref(), Some("http://img"));
    }

    #[tokio::test]
    async fn test_put_quote_ignores_derived_attributes() {
        let store = InMemoryQuoteStore::new();
        let author = store.upsert_author("A", None, None).await.unwrap();
        let mut quote = Quote::new("text", author.id);
        quote.cluster = Some(7);
        store.put_quote(&quote).await.unwrap();

        let fetched = store.get_quote(quote.id).await.unwrap().unwrap();
        assert!(fetched.cluster.is_none());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let store = InMemoryQuoteStore::new();
        store
            .put_embedding(uuid::Uuid::new_v4(), &[0.0; 4])
            .await
            .unwrap();
        let err = store
            .put_embedding(uuid::Uuid::new_v4(), &[0.0; 8])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::DimensionMismatch { expected: 4, actual: 8 }));
    }

    #[tokio::test]
    async fn test_delete_quote_removes_all_state() {
        let store = InMemoryQuoteStore::new();
        let author = store.upsert_author("A", None, None).await.unwrap();
        let quote = Quote::new("text", author.id);
        let other = Quote::new("other", author.id);
        store.put_quote(&quote).await.unwrap();
        store.put_quote(&other).await.unwrap();
        store.put_embedding(quote.id, &[1.0, 0.0]).await.unwrap();
        store
            .replace_similarity_edges(&[SimilarityEdge::new(other.id, quote.id, 0.5)])
            .await
            .unwrap();

        assert!(store.delete_quote(quote.id).await.unwrap());
        assert!(!store.delete_quote(quote.id).await.unwrap());
        assert!(store.get_embedding(quote.id).await.unwrap().is_none());
        assert!(store.similarity_edges().await.unwrap().is_empty());
        assert_eq!(store.count_quotes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_all_embeddings_is_insertion_ordered() {
        let store = InMemoryQuoteStore::new();
        let author = store.upsert_author("A", None, None).await.unwrap();
        let mut ids = Vec::new();
        for i in 0..5 {
            let quote = Quote::new(format!("q{i}"), author.id);
            store.put_quote(&quote).await.unwrap();
            store.put_embedding(quote.id, &[i as f32, 1.0]).await.unwrap();
            ids.push(quote.id);
        }
        let snapshot: Vec<QuoteId> = store
            .all_embeddings()
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(snapshot, ids);
    }
}
