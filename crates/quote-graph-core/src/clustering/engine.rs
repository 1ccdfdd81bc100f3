//! Clustering engine: partitions the embedded corpus and persists the
//! assignment.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ClusteringConfig;
use crate::error::{CoreError, CoreResult};
use crate::traits::QuoteStore;
use crate::types::QuoteId;

use super::kmeans::{l2_normalize, run_kmeans, KMeansParams};

/// Outcome of a clustering pass. A degraded pass (corpus below the
/// requested count, or too small to cluster at all) is reported here,
/// never raised as an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusteringReport {
    pub requested_clusters: usize,
    /// Cluster count actually used; 0 when the corpus had fewer than 2
    /// embedded quotes and nothing was written
    pub effective_clusters: usize,
    pub quotes_clustered: usize,
    pub iterations: usize,
    pub inertia: f32,
}

/// Partitions the embedded corpus with normalized k-means and overwrites
/// the stored cluster assignment.
pub struct ClusteringEngine {
    store: Arc<dyn QuoteStore>,
    config: ClusteringConfig,
}

impl ClusteringEngine {
    pub fn new(store: Arc<dyn QuoteStore>, config: ClusteringConfig) -> Self {
        Self { store, config }
    }

    /// Cluster every quote with an embedding into `n_clusters` groups.
    ///
    /// Requests below 2 clusters are rejected. When the corpus is
    /// smaller than `n_clusters` the count is reduced to
    /// `max(2, corpus / 10)` and the adjustment is logged and reported.
    /// Quotes without embeddings are not part of the input and keep
    /// whatever assignment they had (none, typically).
    pub async fn compute_clusters(&self, n_clusters: usize) -> CoreResult<ClusteringReport> {
        if n_clusters < 2 {
            return Err(CoreError::Config(
                "cluster count must be at least 2".into(),
            ));
        }

        let corpus = self.store.all_embeddings().await?;

        if corpus.len() < 2 {
            warn!(
                corpus = corpus.len(),
                "not enough embedded quotes to cluster, skipping"
            );
            return Ok(ClusteringReport {
                requested_clusters: n_clusters,
                effective_clusters: 0,
                quotes_clustered: 0,
                iterations: 0,
                inertia: 0.0,
            });
        }

        let effective_clusters = if corpus.len() < n_clusters {
            let adjusted = (corpus.len() / 10).max(2);
            warn!(
                requested = n_clusters,
                adjusted,
                corpus = corpus.len(),
                "corpus smaller than requested cluster count, reducing"
            );
            adjusted
        } else {
            n_clusters
        };

        let ids: Vec<QuoteId> = corpus.iter().map(|(id, _)| *id).collect();
        let mut data: Vec<Vec<f32>> = corpus.into_iter().map(|(_, v)| v).collect();
        for v in data.iter_mut() {
            l2_normalize(v);
        }

        let params = KMeansParams {
            n_clusters: effective_clusters,
            n_init: self.config.n_init,
            max_iter: self.config.max_iter,
            tolerance: self.config.tolerance,
            seed: self.config.seed,
        };
        let result = run_kmeans(&data, &params);

        let assignments: HashMap<QuoteId, u32> =
            ids.into_iter().zip(result.labels.iter().copied()).collect();
        self.store.apply_cluster_assignments(&assignments).await?;

        info!(
            clusters = effective_clusters,
            quotes = assignments.len(),
            iterations = result.iterations,
            inertia = result.inertia,
            "cluster assignment updated"
        );

        Ok(ClusteringReport {
            requested_clusters: n_clusters,
            effective_clusters,
            quotes_clustered: assignments.len(),
            iterations: result.iterations,
            inertia: result.inertia,
        })
    }
}
