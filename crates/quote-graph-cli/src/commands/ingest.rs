//! Quote ingestion from a JSON file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::info;

use quote_graph_core::traits::{EmbeddingProvider, QuoteStore};
use quote_graph_core::types::{AuthorId, Quote};
use quote_graph_core::Config;
use quote_graph_embeddings::OpenAiEmbeddingProvider;

#[derive(Args)]
pub struct IngestArgs {
    /// Path to a JSON array of { "text", "author", "context"? } objects
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Deserialize)]
struct IngestRecord {
    text: String,
    author: String,
    #[serde(default)]
    context: Option<String>,
}

#[derive(Serialize)]
struct IngestReport {
    quotes_ingested: usize,
    authors_total: usize,
    batches: usize,
}

pub async fn run(store: Arc<dyn QuoteStore>, config: &Config, args: IngestArgs) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(&args.file).await?;
    let records: Vec<IngestRecord> = serde_json::from_str(&raw)?;
    info!(records = records.len(), file = %args.file.display(), "ingesting quotes");

    let provider = OpenAiEmbeddingProvider::from_config(&config.embedding)?;

    // Resolve authors up front so quote construction is infallible.
    let mut author_ids: HashMap<String, AuthorId> = HashMap::new();
    for record in &records {
        if !author_ids.contains_key(&record.author) {
            let author = store.upsert_author(&record.author, None, None).await?;
            author_ids.insert(record.author.clone(), author.id);
        }
    }

    let quotes: Vec<Quote> = records
        .iter()
        .map(|record| {
            let mut quote = Quote::new(record.text.clone(), author_ids[&record.author]);
            quote.context = record.context.clone();
            quote
        })
        .collect();

    // Each embedding batch is all-or-nothing; quotes and vectors for a
    // batch are only written once the whole batch embedded, so a
    // provider failure never leaves unembedded quotes behind.
    let batch_size = config.embedding.batch_size.max(1);
    let mut ingested = 0;
    let mut batches = 0;
    for chunk in quotes.chunks(batch_size) {
        let texts: Vec<String> = chunk.iter().map(|q| q.text.clone()).collect();
        let vectors = provider.embed_batch(&texts).await?;
        for (quote, vector) in chunk.iter().zip(vectors.iter()) {
            store.put_quote(quote).await?;
            store.put_embedding(quote.id, vector).await?;
        }
        ingested += chunk.len();
        batches += 1;
        info!(ingested, total = quotes.len(), "ingest batch committed");
    }

    let report = IngestReport {
        quotes_ingested: ingested,
        authors_total: author_ids.len(),
        batches,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
