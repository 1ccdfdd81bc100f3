//! Configuration management for the quote graph system.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub similarity: SimilarityConfig,
    pub clustering: ClusteringConfig,
    pub projection: ProjectionConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{QUOTE_GRAPH_ENV}.toml (environment-specific)
    /// 3. Environment variables with QUOTE_GRAPH_ prefix
    pub fn load() -> CoreResult<Self> {
        let env = std::env::var("QUOTE_GRAPH_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("QUOTE_GRAPH").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> CoreResult<()> {
        if self.embedding.dimensions == 0 {
            return Err(CoreError::Config(
                "embedding.dimensions must be positive".into(),
            ));
        }
        if self.embedding.batch_size == 0 {
            return Err(CoreError::Config(
                "embedding.batch_size must be positive".into(),
            ));
        }
        if self.similarity.top_k == 0 {
            return Err(CoreError::Config("similarity.top_k must be positive".into()));
        }
        if self.clustering.n_clusters < 2 {
            return Err(CoreError::Config(
                "clustering.n_clusters must be at least 2".into(),
            ));
        }
        if self.clustering.n_init == 0 {
            return Err(CoreError::Config(
                "clustering.n_init must be positive".into(),
            ));
        }
        if self.projection.n_neighbors < 2 {
            return Err(CoreError::Config(
                "projection.n_neighbors must be at least 2".into(),
            ));
        }
        if !(self.projection.min_dist > 0.0 && self.projection.min_dist < 1.0) {
            return Err(CoreError::Config(
                "projection.min_dist must be in (0, 1)".into(),
            ));
        }
        Ok(())
    }
}

/// Datastore location settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// RocksDB database directory
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/quote-graph"),
        }
    }
}

/// External embedding provider settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible embeddings API
    pub api_base: String,
    /// API key; usually supplied via QUOTE_GRAPH__EMBEDDING__API_KEY
    pub api_key: Option<String>,
    /// Embedding model name
    pub model: String,
    /// Expected embedding dimension; every stored vector is validated
    /// against this
    pub dimensions: usize,
    /// Texts per provider request
    pub batch_size: usize,
    /// Per-batch request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "text-embedding-3-large".to_string(),
            dimensions: 3072,
            batch_size: 50,
            request_timeout_secs: 30,
        }
    }
}

/// Similarity graph settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Outgoing edges kept per quote
    pub top_k: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// K-means clustering settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Requested cluster count; reduced when the corpus is smaller
    pub n_clusters: usize,
    /// Random restarts; the lowest-inertia run wins
    pub n_init: usize,
    /// Iteration cap per restart
    pub max_iter: usize,
    /// Convergence threshold on maximum centroid shift
    pub tolerance: f32,
    /// RNG seed for reproducible assignments
    pub seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            n_clusters: 10,
            n_init: 10,
            max_iter: 500,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

/// 2-D projection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Neighborhood size for the k-NN graph (capped at corpus size - 1)
    pub n_neighbors: usize,
    /// Minimum spacing between embedded points
    pub min_dist: f32,
    /// Layout optimization epochs
    pub n_epochs: usize,
    /// RNG seed for reproducible layouts
    pub seed: u64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 15,
            min_dist: 0.1,
            n_epochs: 200,
            seed: 42,
        }
    }
}

/// Logging settings consumed by the CLI's subscriber setup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter (overridden by RUST_LOG)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.similarity.top_k, 5);
        assert_eq!(config.clustering.n_clusters, 10);
        assert_eq!(config.projection.n_neighbors, 15);
    }

    #[test]
    fn test_validation_rejects_zero_top_k() {
        let mut config = Config::default();
        config.similarity.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_single_cluster() {
        let mut config = Config::default();
        config.clustering.n_clusters = 1;
        assert!(config.validate().is_err());
    }
}
