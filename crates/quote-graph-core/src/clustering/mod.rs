//! Batch clustering of the embedding corpus.
//!
//! Vectors are L2-normalized before clustering, so Euclidean k-means on
//! the normalized corpus approximates cosine-distance clustering.

mod engine;
mod kmeans;

pub use engine::{ClusteringEngine, ClusteringReport};
pub use kmeans::{kmeans_defaults, l2_normalize, run_kmeans, KMeansParams, KMeansResult};
