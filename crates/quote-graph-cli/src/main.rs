//! quote-graph command-line interface.
//!
//! Wires the RocksDB store, the embedding provider, and the analytical
//! engines together behind a small set of subcommands:
//!
//! - `ingest`: load quotes from a JSON file and embed them
//! - `recompute-similarity`: rebuild the top-K similarity edge set
//! - `compute-clusters`: re-run k-means over all embeddings
//! - `project`: recompute the 2-D layout
//! - `refresh`: all three derivation passes in order
//! - `graph` / `stats`: read-only views of the derived graph

mod commands;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quote_graph_core::traits::QuoteStore;
use quote_graph_core::Config;
use quote_graph_storage::RocksDbQuoteStore;

use commands::graph::GraphArgs;
use commands::ingest::IngestArgs;
use commands::pipeline::{ClustersArgs, ProjectArgs, SimilarityArgs};

#[derive(Parser)]
#[command(name = "quote-graph", version, about = "Derived analytical graph over a quote collection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest quotes from a JSON file and embed them
    ///
    /// The file holds an array of `{ "text", "author", "context"? }`
    /// objects. Authors are upserted by name; quotes and their
    /// embeddings are committed per completed embedding batch.
    Ingest(IngestArgs),

    /// Rebuild the directed top-K similarity edge set from scratch
    RecomputeSimilarity(SimilarityArgs),

    /// Re-run k-means clustering over all embedded quotes
    ComputeClusters(ClustersArgs),

    /// Recompute the 2-D projection of the embedding space
    Project(ProjectArgs),

    /// Run similarity, clustering, and projection in order
    Refresh,

    /// Print the visualization graph as JSON
    Graph(GraphArgs),

    /// Print corpus and cluster statistics as JSON
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store: Arc<dyn QuoteStore> = Arc::new(RocksDbQuoteStore::open(&config.storage.path)?);

    match cli.command {
        Commands::Ingest(args) => commands::ingest::run(store, &config, args).await,
        Commands::RecomputeSimilarity(args) => {
            commands::pipeline::recompute_similarity(store, &config, args).await
        }
        Commands::ComputeClusters(args) => {
            commands::pipeline::compute_clusters(store, &config, args).await
        }
        Commands::Project(args) => commands::pipeline::project(store, &config, args).await,
        Commands::Refresh => commands::pipeline::refresh(store, &config).await,
        Commands::Graph(args) => commands::graph::graph(store, args).await,
        Commands::Stats => commands::graph::stats(store).await,
    }
}
