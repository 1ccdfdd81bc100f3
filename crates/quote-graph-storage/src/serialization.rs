//! Binary serialization for storage payloads.
//!
//! Entities with optional fields (`Quote`, `Author`) use MessagePack,
//! which respects serde attributes like `skip_serializing_if`. Numeric
//! payloads (embeddings, scores, cluster ids, coordinates) are raw
//! little-endian bytes with no framing overhead. UUIDs are their 16 raw
//! bytes.
//!
//! Derived attributes (`cluster`, `projection`) are never stored inside
//! the quote record; they live in their own column families and are
//! joined back in on read.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quote_graph_core::types::{Author, Quote, QuoteId};

use crate::error::StorageError;

/// On-disk quote record: the entity minus store-owned derived fields.
#[derive(Debug, Serialize, Deserialize)]
struct StoredQuote {
    id: Uuid,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    author_id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
}

fn corrupt(cf: &str, err: impl std::fmt::Display) -> StorageError {
    StorageError::CorruptRecord {
        cf: cf.to_string(),
        message: err.to_string(),
    }
}

/// Serialize a quote, stripping derived attributes.
pub fn serialize_quote(quote: &Quote) -> Result<Vec<u8>, StorageError> {
    let stored = StoredQuote {
        id: quote.id,
        text: quote.text.clone(),
        context: quote.context.clone(),
        author_id: quote.author_id,
        created_at: quote.created_at,
    };
    rmp_serde::to_vec_named(&stored).map_err(|e| corrupt("quotes", e))
}

/// Deserialize a quote; derived attributes come back as `None`.
pub fn deserialize_quote(bytes: &[u8]) -> Result<Quote, StorageError> {
    let stored: StoredQuote = rmp_serde::from_slice(bytes).map_err(|e| corrupt("quotes", e))?;
    Ok(Quote {
        id: stored.id,
        text: stored.text,
        context: stored.context,
        author_id: stored.author_id,
        cluster: None,
        projection: None,
        created_at: stored.created_at,
    })
}

pub fn serialize_author(author: &Author) -> Result<Vec<u8>, StorageError> {
    rmp_serde::to_vec_named(author).map_err(|e| corrupt("authors", e))
}

pub fn deserialize_author(bytes: &[u8]) -> Result<Author, StorageError> {
    rmp_serde::from_slice(bytes).map_err(|e| corrupt("authors", e))
}

/// UUID keys are exactly their 16 raw bytes.
pub fn serialize_uuid(id: &Uuid) -> [u8; 16] {
    *id.as_bytes()
}

pub fn deserialize_uuid(bytes: &[u8]) -> Result<Uuid, StorageError> {
    let array: [u8; 16] = bytes
        .try_into()
        .map_err(|_| corrupt("uuid", format!("expected 16 bytes, got {}", bytes.len())))?;
    Ok(Uuid::from_bytes(array))
}

/// Embeddings are tightly packed little-endian f32.
pub fn serialize_embedding(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for x in vector {
        bytes.extend_from_slice(&x.to_le_bytes());
    }
    bytes
}

pub fn deserialize_embedding(bytes: &[u8]) -> Result<Vec<f32>, StorageError> {
    if bytes.len() % 4 != 0 {
        return Err(corrupt(
            "embeddings",
            format!("length {} not a multiple of 4", bytes.len()),
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Edge keys are source bytes followed by target bytes, so iterating a
/// source prefix yields its outgoing edges.
pub fn edge_key(source: QuoteId, target: QuoteId) -> [u8; 32] {
    let mut key = [0u8; 32];
    key[..16].copy_from_slice(source.as_bytes());
    key[16..].copy_from_slice(target.as_bytes());
    key
}

pub fn split_edge_key(key: &[u8]) -> Result<(QuoteId, QuoteId), StorageError> {
    if key.len() != 32 {
        return Err(corrupt(
            "edges",
            format!("expected 32-byte key, got {}", key.len()),
        ));
    }
    Ok((deserialize_uuid(&key[..16])?, deserialize_uuid(&key[16..])?))
}

pub fn serialize_f32(value: f32) -> [u8; 4] {
    value.to_le_bytes()
}

pub fn deserialize_f32(bytes: &[u8]) -> Result<f32, StorageError> {
    let array: [u8; 4] = bytes
        .try_into()
        .map_err(|_| corrupt("edges", format!("expected 4 bytes, got {}", bytes.len())))?;
    Ok(f32::from_le_bytes(array))
}

pub fn serialize_u32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

pub fn deserialize_u32(bytes: &[u8]) -> Result<u32, StorageError> {
    let array: [u8; 4] = bytes
        .try_into()
        .map_err(|_| corrupt("clusters", format!("expected 4 bytes, got {}", bytes.len())))?;
    Ok(u32::from_le_bytes(array))
}

/// Projection coordinates are two packed little-endian f32.
pub fn serialize_coords(x: f32, y: f32) -> [u8; 8] {
    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(&x.to_le_bytes());
    bytes[4..].copy_from_slice(&y.to_le_bytes());
    bytes
}

pub fn deserialize_coords(bytes: &[u8]) -> Result<(f32, f32), StorageError> {
    if bytes.len() != 8 {
        return Err(corrupt(
            "projections",
            format!("expected 8 bytes, got {}", bytes.len()),
        ));
    }
    Ok((deserialize_f32(&bytes[..4])?, deserialize_f32(&bytes[4..])?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_roundtrip_strips_derived_fields() {
        let author = Uuid::new_v4();
        let mut quote = Quote::new("to be or not to be", author);
        quote.context = Some("Hamlet".into());
        quote.cluster = Some(3);

        let bytes = serialize_quote(&quote).unwrap();
        let restored = deserialize_quote(&bytes).unwrap();

        assert_eq!(restored.id, quote.id);
        assert_eq!(restored.text, quote.text);
        assert_eq!(restored.context, quote.context);
        assert_eq!(restored.author_id, author);
        assert!(restored.cluster.is_none());
        assert!(restored.projection.is_none());
    }

    #[test]
    fn test_author_roundtrip() {
        let mut author = Author::new("Oscar Wilde");
        author.image_url = Some("https://example.com/wilde.jpg".into());

        let bytes = serialize_author(&author).unwrap();
        let restored = deserialize_author(&bytes).unwrap();
        assert_eq!(restored, author);
    }

    #[test]
    fn test_embedding_roundtrip_preserves_exact_values() {
        let vector = vec![0.5_f32, -1.25, f32::MIN_POSITIVE, 3.75e8];
        let bytes = serialize_embedding(&vector);
        assert_eq!(bytes.len(), 16);
        assert_eq!(deserialize_embedding(&bytes).unwrap(), vector);
    }

    #[test]
    fn test_embedding_rejects_truncated_bytes() {
        assert!(deserialize_embedding(&[0u8; 7]).is_err());
    }

    #[test]
    fn test_edge_key_roundtrip() {
        let source = Uuid::new_v4();
        let target = Uuid::new_v4();
        let key = edge_key(source, target);
        assert_eq!(split_edge_key(&key).unwrap(), (source, target));
        assert_eq!(&key[..16], source.as_bytes());
    }

    #[test]
    fn test_coords_roundtrip() {
        let bytes = serialize_coords(0.25, 1.0);
        assert_eq!(deserialize_coords(&bytes).unwrap(), (0.25, 1.0));
    }
}
