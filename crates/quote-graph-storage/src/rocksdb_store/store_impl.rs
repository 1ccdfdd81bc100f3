//! `QuoteStore` trait implementation for `RocksDbQuoteStore`.

use std::collections::HashMap;

use async_trait::async_trait;
use rocksdb::{IteratorMode, WriteBatch};
use tracing::debug;

use quote_graph_core::error::{CoreError, CoreResult};
use quote_graph_core::traits::{QuoteFilter, QuoteStore};
use quote_graph_core::types::{
    Author, AuthorId, EmbeddingVector, Projection, Quote, QuoteId, SimilarityEdge,
};

use crate::column_families::{cf_names, SYSTEM_KEY_DIMENSIONS};
use crate::error::StorageError;
use crate::serialization::{
    deserialize_author, deserialize_coords, deserialize_embedding, deserialize_f32,
    deserialize_quote, deserialize_u32, deserialize_uuid, edge_key, serialize_author,
    serialize_coords, serialize_embedding, serialize_f32, serialize_quote, serialize_u32,
    serialize_uuid, split_edge_key,
};

use super::RocksDbQuoteStore;

impl RocksDbQuoteStore {
    fn read_author(&self, id: AuthorId) -> Result<Option<Author>, StorageError> {
        let cf = self.get_cf(cf_names::AUTHORS)?;
        match self.db.get_cf(cf, serialize_uuid(&id))? {
            Some(bytes) => Ok(Some(deserialize_author(&bytes)?)),
            None => Ok(None),
        }
    }

    fn read_quote_joined(&self, id: QuoteId) -> Result<Option<Quote>, StorageError> {
        let cf = self.get_cf(cf_names::QUOTES)?;
        let Some(bytes) = self.db.get_cf(cf, serialize_uuid(&id))? else {
            return Ok(None);
        };
        let mut quote = deserialize_quote(&bytes)?;
        self.join_derived(&mut quote)?;
        Ok(Some(quote))
    }

    fn join_derived(&self, quote: &mut Quote) -> Result<(), StorageError> {
        let key = serialize_uuid(&quote.id);

        let clusters = self.get_cf(cf_names::CLUSTERS)?;
        quote.cluster = match self.db.get_cf(clusters, key)? {
            Some(bytes) => Some(deserialize_u32(&bytes)?),
            None => None,
        };

        let projections = self.get_cf(cf_names::PROJECTIONS)?;
        quote.projection = match self.db.get_cf(projections, key)? {
            Some(bytes) => {
                let (x, y) = deserialize_coords(&bytes)?;
                Some(Projection { x, y })
            }
            None => None,
        };
        Ok(())
    }

    /// Overwrite an entire column family with the provided entries in a
    /// single atomic batch.
    fn overwrite_cf(
        &self,
        cf_name: &str,
        entries: impl Iterator<Item = (Vec<u8>, Vec<u8>)>,
    ) -> Result<(), StorageError> {
        let cf = self.get_cf(cf_name)?;
        let mut batch = WriteBatch::default();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, _) = item?;
            batch.delete_cf(cf, key);
        }
        for (key, value) in entries {
            batch.put_cf(cf, key, value);
        }
        self.db
            .write(batch)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    fn stored_dimensions(&self) -> Result<Option<u32>, StorageError> {
        let cf = self.get_cf(cf_names::SYSTEM)?;
        match self.db.get_cf(cf, SYSTEM_KEY_DIMENSIONS)? {
            Some(bytes) => Ok(Some(deserialize_u32(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl QuoteStore for RocksDbQuoteStore {
    async fn upsert_author(
        &self,
        name: &str,
        bio: Option<&str>,
        image_url: Option<&str>,
    ) -> CoreResult<Author> {
        let names_cf = self.get_cf(cf_names::AUTHOR_NAMES)?;

        if let Some(id_bytes) = self.db.get_cf(names_cf, name.as_bytes()).map_err(StorageError::from)? {
            let id = deserialize_uuid(&id_bytes)?;
            let mut author = self
                .read_author(id)?
                .ok_or(CoreError::AuthorNotFound { id })?;
            if let Some(bio) = bio {
                author.bio = Some(bio.to_string());
            }
            if let Some(image_url) = image_url {
                author.image_url = Some(image_url.to_string());
            }
            let authors_cf = self.get_cf(cf_names::AUTHORS)?;
            self.db
                .put_cf(authors_cf, serialize_uuid(&author.id), serialize_author(&author)?)
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            return Ok(author);
        }

        let mut author = Author::new(name);
        author.bio = bio.map(String::from);
        author.image_url = image_url.map(String::from);

        let authors_cf = self.get_cf(cf_names::AUTHORS)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(authors_cf, serialize_uuid(&author.id), serialize_author(&author)?);
        batch.put_cf(names_cf, name.as_bytes(), serialize_uuid(&author.id));
        self.db
            .write(batch)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(author)
    }

    async fn get_author(&self, id: AuthorId) -> CoreResult<Option<Author>> {
        Ok(self.read_author(id)?)
    }

    async fn find_author_by_name(&self, name: &str) -> CoreResult<Option<Author>> {
        let names_cf = self.get_cf(cf_names::AUTHOR_NAMES)?;
        match self.db.get_cf(names_cf, name.as_bytes()).map_err(StorageError::from)? {
            Some(id_bytes) => {
                let id = deserialize_uuid(&id_bytes)?;
                Ok(self.read_author(id)?)
            }
            None => Ok(None),
        }
    }

    async fn list_authors(&self) -> CoreResult<Vec<Author>> {
        let cf = self.get_cf(cf_names::AUTHORS)?;
        let mut authors = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item.map_err(StorageError::from)?;
            authors.push(deserialize_author(&value)?);
        }
        authors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(authors)
    }

    async fn put_quote(&self, quote: &Quote) -> CoreResult<()> {
        let cf = self.get_cf(cf_names::QUOTES)?;
        self.db
            .put_cf(cf, serialize_uuid(&quote.id), serialize_quote(quote)?)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn get_quote(&self, id: QuoteId) -> CoreResult<Option<Quote>> {
        Ok(self.read_quote_joined(id)?)
    }

    async fn list_quotes(&self, filter: QuoteFilter) -> CoreResult<Vec<Quote>> {
        let cf = self.get_cf(cf_names::QUOTES)?;
        let mut quotes = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item.map_err(StorageError::from)?;
            let mut quote = deserialize_quote(&value)?;
            self.join_derived(&mut quote)?;
            if let Some(author_id) = filter.author_id {
                if quote.author_id != author_id {
                    continue;
                }
            }
            if let Some(cluster) = filter.cluster {
                if quote.cluster != Some(cluster) {
                    continue;
                }
            }
            quotes.push(quote);
        }
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            quotes.truncate(limit);
        }
        Ok(quotes)
    }

    async fn delete_quote(&self, id: QuoteId) -> CoreResult<bool> {
        let quotes_cf = self.get_cf(cf_names::QUOTES)?;
        let key = serialize_uuid(&id);
        if self
            .db
            .get_cf(quotes_cf, key)
            .map_err(StorageError::from)?
            .is_none()
        {
            return Ok(false);
        }

        let mut batch = WriteBatch::default();
        batch.delete_cf(quotes_cf, key);
        batch.delete_cf(self.get_cf(cf_names::EMBEDDINGS)?, key);
        batch.delete_cf(self.get_cf(cf_names::CLUSTERS)?, key);
        batch.delete_cf(self.get_cf(cf_names::PROJECTIONS)?, key);

        // Edges referencing the quote in either direction go with it.
        let edges_cf = self.get_cf(cf_names::EDGES)?;
        for item in self.db.iterator_cf(edges_cf, IteratorMode::Start) {
            let (edge_key_bytes, _) = item.map_err(StorageError::from)?;
            let (source, target) = split_edge_key(&edge_key_bytes)?;
            if source == id || target == id {
                batch.delete_cf(edges_cf, edge_key_bytes);
            }
        }

        self.db
            .write(batch)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(true)
    }

    async fn count_quotes(&self) -> CoreResult<usize> {
        let cf = self.get_cf(cf_names::QUOTES)?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item.map_err(StorageError::from)?;
            count += 1;
        }
        Ok(count)
    }

    async fn put_embedding(&self, id: QuoteId, vector: &[f32]) -> CoreResult<()> {
        match self.stored_dimensions()? {
            Some(expected) if expected as usize != vector.len() => {
                return Err(CoreError::DimensionMismatch {
                    expected: expected as usize,
                    actual: vector.len(),
                });
            }
            Some(_) => {
                let cf = self.get_cf(cf_names::EMBEDDINGS)?;
                self.db
                    .put_cf(cf, serialize_uuid(&id), serialize_embedding(vector))
                    .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            }
            None => {
                // First vector fixes the deployment dimension.
                let mut batch = WriteBatch::default();
                batch.put_cf(
                    self.get_cf(cf_names::SYSTEM)?,
                    SYSTEM_KEY_DIMENSIONS,
                    serialize_u32(vector.len() as u32),
                );
                batch.put_cf(
                    self.get_cf(cf_names::EMBEDDINGS)?,
                    serialize_uuid(&id),
                    serialize_embedding(vector),
                );
                self.db
                    .write(batch)
                    .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            }
        }
        Ok(())
    }

    async fn get_embedding(&self, id: QuoteId) -> CoreResult<Option<EmbeddingVector>> {
        let cf = self.get_cf(cf_names::EMBEDDINGS)?;
        match self
            .db
            .get_cf(cf, serialize_uuid(&id))
            .map_err(StorageError::from)?
        {
            Some(bytes) => Ok(Some(deserialize_embedding(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn all_embeddings(&self) -> CoreResult<Vec<(QuoteId, EmbeddingVector)>> {
        let cf = self.get_cf(cf_names::EMBEDDINGS)?;
        let mut embeddings = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item.map_err(StorageError::from)?;
            embeddings.push((deserialize_uuid(&key)?, deserialize_embedding(&value)?));
        }
        Ok(embeddings)
    }

    async fn replace_similarity_edges(&self, edges: &[SimilarityEdge]) -> CoreResult<()> {
        self.overwrite_cf(
            cf_names::EDGES,
            edges.iter().map(|e| {
                (
                    edge_key(e.source, e.target).to_vec(),
                    serialize_f32(e.score).to_vec(),
                )
            }),
        )?;
        debug!(edges = edges.len(), "similarity edge set replaced");
        Ok(())
    }

    async fn similarity_edges(&self) -> CoreResult<Vec<SimilarityEdge>> {
        let cf = self.get_cf(cf_names::EDGES)?;
        let mut edges = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item.map_err(StorageError::from)?;
            let (source, target) = split_edge_key(&key)?;
            edges.push(SimilarityEdge {
                source,
                target,
                score: deserialize_f32(&value)?,
            });
        }
        Ok(edges)
    }

    async fn apply_cluster_assignments(
        &self,
        assignments: &HashMap<QuoteId, u32>,
    ) -> CoreResult<()> {
        self.overwrite_cf(
            cf_names::CLUSTERS,
            assignments.iter().map(|(id, &cluster)| {
                (serialize_uuid(id).to_vec(), serialize_u32(cluster).to_vec())
            }),
        )?;
        debug!(quotes = assignments.len(), "cluster assignment replaced");
        Ok(())
    }

    async fn cluster_assignments(&self) -> CoreResult<HashMap<QuoteId, u32>> {
        let cf = self.get_cf(cf_names::CLUSTERS)?;
        let mut assignments = HashMap::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item.map_err(StorageError::from)?;
            assignments.insert(deserialize_uuid(&key)?, deserialize_u32(&value)?);
        }
        Ok(assignments)
    }

    async fn apply_projections(&self, coords: &HashMap<QuoteId, (f32, f32)>) -> CoreResult<()> {
        self.overwrite_cf(
            cf_names::PROJECTIONS,
            coords.iter().map(|(id, &(x, y))| {
                (serialize_uuid(id).to_vec(), serialize_coords(x, y).to_vec())
            }),
        )?;
        debug!(quotes = coords.len(), "projection coordinates replaced");
        Ok(())
    }
}
