//! Quote entity: a short text record with a derived embedding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthorId;

/// Unique identifier for quotes.
pub type QuoteId = Uuid;

/// Embedding vector type. Dimension is fixed per deployment and enforced
/// by the store on write.
pub type EmbeddingVector = Vec<f32>;

/// 2-D layout coordinates in the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub x: f32,
    pub y: f32,
}

/// A quote attributed to exactly one author.
///
/// `cluster` and `projection` are derived attributes written by the
/// clustering and projection passes; they are absent until the first run
/// and stale until the next one. The embedding vector itself lives in the
/// store's embedding map and is not part of this struct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    /// Unique identifier
    pub id: QuoteId,

    /// The quote text
    pub text: String,

    /// Optional surrounding context (speech, book, interview, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// The author this quote is attributed to
    pub author_id: AuthorId,

    /// Cluster index assigned by the last clustering pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<u32>,

    /// Coordinates assigned by the last projection pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Create a new quote with a fresh id and no derived attributes.
    pub fn new(text: impl Into<String>, author_id: AuthorId) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            context: None,
            author_id,
            cluster: None,
            projection: None,
            created_at: Utc::now(),
        }
    }

    /// Attach surrounding context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Label used for graph nodes: the text truncated to `max_chars`
    /// characters with a trailing ellipsis.
    pub fn label(&self, max_chars: usize) -> String {
        if self.text.chars().count() <= max_chars {
            self.text.clone()
        } else {
            let truncated: String = self.text.chars().take(max_chars).collect();
            format!("{truncated}...")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_quote_has_no_derived_attributes() {
        let quote = Quote::new("The unexamined life is not worth living", Uuid::new_v4());
        assert!(quote.cluster.is_none());
        assert!(quote.projection.is_none());
        assert!(quote.context.is_none());
    }

    #[test]
    fn test_label_truncation() {
        let author = Uuid::new_v4();
        let short = Quote::new("short", author);
        assert_eq!(short.label(50), "short");

        let long = Quote::new("x".repeat(80), author);
        let label = long.label(50);
        assert_eq!(label.chars().count(), 53);
        assert!(label.ends_with("..."));
    }

    #[test]
    fn test_label_is_char_safe() {
        // Multi-byte characters must not be split.
        let quote = Quote::new("é".repeat(60), Uuid::new_v4());
        assert_eq!(quote.label(50).chars().count(), 53);
    }
}
