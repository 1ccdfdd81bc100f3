//! Stub implementations for tests and offline development.

mod embedding_stub;
mod memory_store;

pub use embedding_stub::StubEmbeddingProvider;
pub use memory_store::InMemoryQuoteStore;
