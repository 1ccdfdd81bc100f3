//! Quote Graph Storage
//!
//! RocksDB-backed persistence for quotes, authors, embedding vectors,
//! and the derived similarity/cluster/projection state, implementing the
//! `QuoteStore` trait from `quote-graph-core`.
//!
//! # Layout
//!
//! One column family per concern (see [`column_families`]); entities are
//! MessagePack-encoded, numeric payloads are raw little-endian bytes.
//! Every derived-state overwrite is applied as a single `WriteBatch`, so
//! concurrent readers never observe a partially replaced edge set or
//! assignment.

pub mod column_families;
pub mod error;
pub mod rocksdb_store;
pub mod serialization;

pub use error::StorageError;
pub use rocksdb_store::{RocksDbConfig, RocksDbQuoteStore};
