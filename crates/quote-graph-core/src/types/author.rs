//! Author entity: the person a quote is attributed to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for authors.
pub type AuthorId = Uuid;

/// An author. Display names are unique within the store; the store's
/// upsert keys on the name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    /// Unique identifier
    pub id: AuthorId,

    /// Unique display name
    pub name: String,

    /// Optional short biography
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// Optional portrait URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Author {
    /// Create a new author with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bio: None,
            image_url: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_creation() {
        let author = Author::new("Marcus Aurelius");
        assert_eq!(author.name, "Marcus Aurelius");
        assert!(author.bio.is_none());
        assert!(author.image_url.is_none());
    }
}
