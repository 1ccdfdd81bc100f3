//! Read-only graph and statistics subcommands.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::info;

use quote_graph_core::graph::GraphAggregator;
use quote_graph_core::traits::QuoteStore;

#[derive(Args)]
pub struct GraphArgs {
    /// Write the graph JSON to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub async fn graph(store: Arc<dyn QuoteStore>, args: GraphArgs) -> anyhow::Result<()> {
    let aggregator = GraphAggregator::new(store);
    let data = aggregator.get_graph().await?;
    let json = serde_json::to_string_pretty(&data)?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, json).await?;
            info!(
                nodes = data.nodes.len(),
                edges = data.edges.len(),
                path = %path.display(),
                "graph written"
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub async fn stats(store: Arc<dyn QuoteStore>) -> anyhow::Result<()> {
    let aggregator = GraphAggregator::new(store);
    let stats = aggregator.get_stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
