//! CLI subcommand implementations.

pub mod graph;
pub mod ingest;
pub mod pipeline;
