//! Summary statistics over quotes, authors, clusters, and edges.

use serde::{Deserialize, Serialize};

/// Quote count for a single author, used for the top-authors ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorQuoteCount {
    pub name: String,
    pub quote_count: usize,
}

/// Per-cluster statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterStats {
    pub cluster_id: u32,
    /// Number of quotes assigned to this cluster
    pub quote_count: usize,
    /// Mean score of similarity edges whose endpoints are both in this
    /// cluster; 0.0 when there are none
    pub avg_similarity: f32,
}

/// Aggregate statistics re-derived from the store on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphStats {
    pub total_quotes: usize,
    pub total_authors: usize,
    /// `total_quotes / total_authors`, 0.0 when there are no authors
    pub avg_quotes_per_author: f64,
    /// Top 10 authors by quote count, descending
    pub top_authors: Vec<AuthorQuoteCount>,
    pub total_clusters: usize,
    /// Per-cluster stats ordered by cluster id
    pub cluster_distribution: Vec<ClusterStats>,
    /// Assigned quotes per cluster, 0.0 when there are no clusters
    pub avg_cluster_size: f64,
}

impl GraphStats {
    /// All-zero stats, returned for an empty store.
    pub fn empty() -> Self {
        Self {
            total_quotes: 0,
            total_authors: 0,
            avg_quotes_per_author: 0.0,
            top_authors: Vec::new(),
            total_clusters: 0,
            cluster_distribution: Vec::new(),
            avg_cluster_size: 0.0,
        }
    }
}
