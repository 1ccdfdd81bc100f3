//! RocksDB column family definitions.
//!
//! Column families provide logical separation of data types and let the
//! maintenance passes overwrite one concern without touching the others.
//!
//! # Column Families
//! | Name | Purpose | Key | Value |
//! |------|---------|-----|-------|
//! | quotes | Quote entities | QuoteId (UUID bytes) | MessagePack |
//! | authors | Author entities | AuthorId (UUID bytes) | MessagePack |
//! | author_names | Unique-name index | display name (UTF-8) | AuthorId bytes |
//! | embeddings | Embedding vectors | QuoteId bytes | raw LE f32 |
//! | edges | Similarity edges | source bytes ‖ target bytes | score LE f32 |
//! | clusters | Cluster assignment | QuoteId bytes | cluster LE u32 |
//! | projections | 2-D coordinates | QuoteId bytes | x,y LE f32 |
//! | system | Deployment metadata | key string | value bytes |

use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options};

/// Column family name constants.
pub mod cf_names {
    pub const QUOTES: &str = "quotes";
    pub const AUTHORS: &str = "authors";
    pub const AUTHOR_NAMES: &str = "author_names";
    pub const EMBEDDINGS: &str = "embeddings";
    pub const EDGES: &str = "edges";
    pub const CLUSTERS: &str = "clusters";
    pub const PROJECTIONS: &str = "projections";
    pub const SYSTEM: &str = "system";

    /// All column families, in creation order.
    pub const ALL: [&str; 8] = [
        QUOTES,
        AUTHORS,
        AUTHOR_NAMES,
        EMBEDDINGS,
        EDGES,
        CLUSTERS,
        PROJECTIONS,
        SYSTEM,
    ];
}

/// System CF key recording the embedding dimension of this deployment.
pub const SYSTEM_KEY_DIMENSIONS: &[u8] = b"embedding_dimensions";

/// Build descriptors for all column families, sharing one block cache.
pub fn get_column_family_descriptors(cache: &Cache) -> Vec<ColumnFamilyDescriptor> {
    cf_names::ALL
        .iter()
        .map(|name| {
            let mut opts = Options::default();
            let mut block_opts = BlockBasedOptions::default();
            block_opts.set_block_cache(cache);
            opts.set_block_based_table_factory(&block_opts);
            ColumnFamilyDescriptor::new(*name, opts)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_are_unique() {
        let mut names: Vec<&str> = cf_names::ALL.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), cf_names::ALL.len());
    }

    #[test]
    fn test_descriptor_count_matches_names() {
        let cache = Cache::new_lru_cache(1024 * 1024);
        let descriptors = get_column_family_descriptors(&cache);
        assert_eq!(descriptors.len(), cf_names::ALL.len());
    }
}
