//! Error types for quote-graph-core.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for quote-graph-core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Quote not found: {id}")]
    QuoteNotFound { id: Uuid },

    #[error("Author not found: {id}")]
    AuthorNotFound { id: Uuid },

    #[error("Quote {id} has no embedding")]
    EmbeddingMissing { id: Uuid },

    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding provider error: {0}")]
    Provider(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
