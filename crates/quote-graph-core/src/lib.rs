//! Quote Graph Core Library
//!
//! Provides the domain types, storage/provider traits, and the analytical
//! engines that maintain the derived graph over a quote collection:
//!
//! - Domain types (`Quote`, `Author`, `SimilarityEdge`, graph/stat shapes)
//! - Core traits (`QuoteStore`, `EmbeddingProvider`)
//! - `SimilarityEngine`: exact top-K cosine similarity graph rebuild
//! - `ClusteringEngine`: normalized k-means partitioning
//! - `ProjectionEngine`: 2-D UMAP-style layout of the embedding space
//! - `GraphAggregator`: visualization graph and summary statistics
//! - Error types, configuration, and stub implementations for tests
//!
//! Each engine holds an explicit `Arc<dyn QuoteStore>` handle; there is no
//! ambient global state.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quote_graph_core::similarity::SimilarityEngine;
//! use quote_graph_core::stubs::InMemoryQuoteStore;
//!
//! let store = Arc::new(InMemoryQuoteStore::new());
//! let engine = SimilarityEngine::new(store);
//! ```

pub mod clustering;
pub mod config;
pub mod error;
pub mod graph;
pub mod projection;
pub mod similarity;
pub mod stubs;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use traits::{EmbeddingProvider, QuoteFilter, QuoteStore};
pub use types::{Author, AuthorId, Quote, QuoteId, SimilarityEdge};
