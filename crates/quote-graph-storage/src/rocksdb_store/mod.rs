//! RocksDB-backed quote store.

mod store_impl;

use rocksdb::{Cache, ColumnFamily, Options, DB};
use std::path::Path;

use crate::column_families::{cf_names, get_column_family_descriptors};
use crate::error::StorageError;

/// RocksDB tuning options.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Shared block cache size in bytes
    pub block_cache_size: usize,
    /// RocksDB max open files (-1 = unlimited)
    pub max_open_files: i32,
    /// Create the database directory if missing
    pub create_if_missing: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            block_cache_size: 64 * 1024 * 1024,
            max_open_files: 512,
            create_if_missing: true,
        }
    }
}

/// RocksDB-backed implementation of `QuoteStore`.
///
/// # Thread Safety
/// RocksDB's `DB` is internally thread-safe for concurrent reads and
/// writes, so this struct is shared across tasks via
/// `Arc<RocksDbQuoteStore>`.
///
/// # Consistency
/// Every derived-state overwrite (edges, clusters, projections) and every
/// multi-key entity mutation is staged in a single `WriteBatch`, so a
/// reader sees either the old state or the new one, never a mix.
pub struct RocksDbQuoteStore {
    pub(crate) db: DB,
    /// Shared block cache (kept alive for the DB lifetime).
    #[allow(dead_code)]
    cache: Cache,
    path: String,
}

impl RocksDbQuoteStore {
    /// Open a database at `path` with default configuration, creating it
    /// and all column families if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Self::open_with_config(path, RocksDbConfig::default())
    }

    /// Open a database with custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: RocksDbConfig,
    ) -> Result<Self, StorageError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let cache = Cache::new_lru_cache(config.block_cache_size);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(config.create_if_missing);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_open_files(config.max_open_files);

        let cf_descriptors = get_column_family_descriptors(&cache);

        let db = DB::open_cf_descriptors(&db_opts, &path_str, cf_descriptors).map_err(|e| {
            StorageError::OpenFailed {
                path: path_str.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            db,
            cache,
            path: path_str,
        })
    }

    /// Get a column family handle by name (use `cf_names::*` constants).
    pub(crate) fn get_cf(&self, name: &str) -> Result<&ColumnFamily, StorageError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound {
                name: name.to_string(),
            })
    }

    /// Database directory path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Verify all column families are accessible.
    pub fn health_check(&self) -> Result<(), StorageError> {
        for cf_name in cf_names::ALL {
            self.get_cf(cf_name)?;
        }
        Ok(())
    }
}
