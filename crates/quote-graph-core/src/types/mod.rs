//! Core domain types for the quote graph.

mod author;
mod edge;
mod graph;
mod quote;
mod stats;

pub use author::{Author, AuthorId};
pub use edge::SimilarityEdge;
pub use graph::{GraphData, GraphLink, GraphNode, LinkKind, NodeData, NodeKind};
pub use quote::{EmbeddingVector, Projection, Quote, QuoteId};
pub use stats::{AuthorQuoteCount, ClusterStats, GraphStats};
