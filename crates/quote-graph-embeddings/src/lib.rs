//! Embedding provider implementations for quote-graph.
//!
//! The only production provider talks to an OpenAI-compatible
//! `/embeddings` endpoint; deterministic offline stubs live in
//! `quote-graph-core` next to the trait they implement.

mod openai;

pub use openai::OpenAiEmbeddingProvider;
