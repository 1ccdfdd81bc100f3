//! Storage error types.

use thiserror::Error;

use quote_graph_core::CoreError;

/// Errors raised by the RocksDB backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to open database at {path}: {message}")]
    OpenFailed { path: String, message: String },

    #[error("Column family not found: {name}")]
    ColumnFamilyNotFound { name: String },

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Corrupt record in {cf}: {message}")]
    CorruptRecord { cf: String, message: String },
}

impl From<rocksdb::Error> for StorageError {
    fn from(err: rocksdb::Error) -> Self {
        StorageError::ReadFailed(err.to_string())
    }
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_maps_to_core_error() {
        let err = StorageError::ColumnFamilyNotFound {
            name: "edges".into(),
        };
        let core: CoreError = err.into();
        assert!(core.to_string().contains("edges"));
    }
}
