//! Quote store trait: the vector store accessor plus the entity CRUD the
//! aggregator depends on.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{Author, AuthorId, EmbeddingVector, Quote, QuoteId, SimilarityEdge};

/// Filter options for quote listing.
#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    /// Restrict to one author
    pub author_id: Option<AuthorId>,
    /// Restrict to one cluster
    pub cluster: Option<u32>,
    /// Maximum results; None returns everything
    pub limit: Option<usize>,
}

impl QuoteFilter {
    /// Filter by author.
    pub fn with_author(mut self, author_id: AuthorId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Filter by cluster index.
    pub fn with_cluster(mut self, cluster: u32) -> Self {
        self.cluster = Some(cluster);
        self
    }

    /// Cap the number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Persistent storage abstraction for quotes, authors, embeddings, and
/// the derived similarity/cluster/projection state.
///
/// Engines hold this as `Arc<dyn QuoteStore>`; implementations must be
/// safe for concurrent readers. The derived-state writers
/// (`replace_similarity_edges`, `apply_cluster_assignments`,
/// `apply_projections`) fully overwrite prior state and should apply
/// each call as a single batch so readers never observe a mixed set.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    // --- Authors ---

    /// Create or update an author keyed by unique display name.
    ///
    /// On update, `bio` and `image_url` only overwrite existing values
    /// when `Some`.
    async fn upsert_author(
        &self,
        name: &str,
        bio: Option<&str>,
        image_url: Option<&str>,
    ) -> CoreResult<Author>;

    /// Retrieve an author by id, None if not found.
    async fn get_author(&self, id: AuthorId) -> CoreResult<Option<Author>>;

    /// Retrieve an author by display name, None if not found.
    async fn find_author_by_name(&self, name: &str) -> CoreResult<Option<Author>>;

    /// List all authors.
    async fn list_authors(&self) -> CoreResult<Vec<Author>>;

    // --- Quotes ---

    /// Insert or replace a quote. Derived cluster/projection attributes
    /// on the argument are ignored; the store owns those.
    async fn put_quote(&self, quote: &Quote) -> CoreResult<()>;

    /// Retrieve a quote by id with derived attributes joined in.
    async fn get_quote(&self, id: QuoteId) -> CoreResult<Option<Quote>>;

    /// List quotes matching the filter, newest first.
    async fn list_quotes(&self, filter: QuoteFilter) -> CoreResult<Vec<Quote>>;

    /// Delete a quote, its embedding, derived attributes, and any
    /// similarity edges touching it. Returns true if the quote existed.
    async fn delete_quote(&self, id: QuoteId) -> CoreResult<bool>;

    /// Total quote count, with or without embeddings.
    async fn count_quotes(&self) -> CoreResult<usize>;

    // --- Embeddings ---

    /// Store a quote's embedding vector. The dimension is validated
    /// against the first vector ever written.
    async fn put_embedding(&self, id: QuoteId, vector: &[f32]) -> CoreResult<()>;

    /// Retrieve a quote's embedding, None if never embedded.
    async fn get_embedding(&self, id: QuoteId) -> CoreResult<Option<EmbeddingVector>>;

    /// One consistent snapshot of every (id, vector) pair. Quotes
    /// without vectors are not included.
    async fn all_embeddings(&self) -> CoreResult<Vec<(QuoteId, EmbeddingVector)>>;

    // --- Derived state ---

    /// Destructively replace the whole similarity edge set.
    async fn replace_similarity_edges(&self, edges: &[SimilarityEdge]) -> CoreResult<()>;

    /// All stored similarity edges.
    async fn similarity_edges(&self) -> CoreResult<Vec<SimilarityEdge>>;

    /// Overwrite the full cluster assignment (no merge semantics).
    async fn apply_cluster_assignments(
        &self,
        assignments: &HashMap<QuoteId, u32>,
    ) -> CoreResult<()>;

    /// Current cluster assignment.
    async fn cluster_assignments(&self) -> CoreResult<HashMap<QuoteId, u32>>;

    /// Overwrite the full set of 2-D projection coordinates.
    async fn apply_projections(&self, coords: &HashMap<QuoteId, (f32, f32)>) -> CoreResult<()>;
}
