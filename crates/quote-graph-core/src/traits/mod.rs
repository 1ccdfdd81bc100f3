//! Core trait definitions for external collaborators.

mod provider;
mod store;

pub use provider::EmbeddingProvider;
pub use store::{QuoteFilter, QuoteStore};
