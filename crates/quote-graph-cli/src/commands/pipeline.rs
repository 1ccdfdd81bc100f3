//! Derivation pass subcommands: similarity, clustering, projection.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tracing::info;

use quote_graph_core::clustering::{ClusteringEngine, ClusteringReport};
use quote_graph_core::projection::{ProjectionEngine, ProjectionReport};
use quote_graph_core::similarity::{RecomputeReport, SimilarityEngine};
use quote_graph_core::traits::QuoteStore;
use quote_graph_core::Config;

#[derive(Args)]
pub struct SimilarityArgs {
    /// Outgoing edges per quote; defaults to the configured value
    #[arg(long)]
    pub top_k: Option<usize>,
}

#[derive(Args)]
pub struct ClustersArgs {
    /// Requested cluster count; defaults to the configured value
    #[arg(long)]
    pub clusters: Option<usize>,
}

#[derive(Args)]
pub struct ProjectArgs {}

#[derive(Serialize)]
struct RefreshReport {
    similarity: RecomputeReport,
    clustering: ClusteringReport,
    projection: ProjectionReport,
}

pub async fn recompute_similarity(
    store: Arc<dyn QuoteStore>,
    config: &Config,
    args: SimilarityArgs,
) -> anyhow::Result<()> {
    let top_k = args.top_k.unwrap_or(config.similarity.top_k);
    let engine = SimilarityEngine::new(store);
    let report = engine.recompute_all(top_k).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub async fn compute_clusters(
    store: Arc<dyn QuoteStore>,
    config: &Config,
    args: ClustersArgs,
) -> anyhow::Result<()> {
    let n_clusters = args.clusters.unwrap_or(config.clustering.n_clusters);
    let engine = ClusteringEngine::new(store, config.clustering.clone());
    let report = engine.compute_clusters(n_clusters).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub async fn project(
    store: Arc<dyn QuoteStore>,
    config: &Config,
    _args: ProjectArgs,
) -> anyhow::Result<()> {
    let engine = ProjectionEngine::new(store, config.projection.clone());
    let report = engine.project_2d().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Run all three derivation passes in order. A failed pass aborts the
/// refresh and leaves later passes untouched.
pub async fn refresh(store: Arc<dyn QuoteStore>, config: &Config) -> anyhow::Result<()> {
    info!("refreshing all derived state");

    let similarity = SimilarityEngine::new(Arc::clone(&store))
        .recompute_all(config.similarity.top_k)
        .await?;
    let clustering = ClusteringEngine::new(Arc::clone(&store), config.clustering.clone())
        .compute_clusters(config.clustering.n_clusters)
        .await?;
    let projection = ProjectionEngine::new(store, config.projection.clone())
        .project_2d()
        .await?;

    let report = RefreshReport { similarity, clustering, projection };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
