//! Graph aggregator: materializes the visualization graph and summary
//! statistics from already-derived state.
//!
//! Pure read-side aggregation. Nothing is cached; every call re-derives
//! from the store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::CoreResult;
use crate::traits::{QuoteFilter, QuoteStore};
use crate::types::{
    AuthorId, AuthorQuoteCount, ClusterStats, GraphData, GraphLink, GraphNode, GraphStats,
    LinkKind, NodeData, NodeKind,
};

/// Node labels truncate quote text at this many characters.
const LABEL_MAX_CHARS: usize = 50;

/// Number of authors in the top-authors ranking.
const TOP_AUTHORS: usize = 10;

/// Read-only aggregation over quotes, authors, similarity edges, and
/// cluster assignments.
pub struct GraphAggregator {
    store: Arc<dyn QuoteStore>,
}

impl GraphAggregator {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self { store }
    }

    /// Assemble the full visualization graph: one node per quote, one per
    /// referenced author (deduplicated), an `attributed_to` link per
    /// quote, and a `similar_to` link per stored similarity edge.
    pub async fn get_graph(&self) -> CoreResult<GraphData> {
        let quotes = self.store.list_quotes(QuoteFilter::default()).await?;
        let authors: HashMap<AuthorId, _> = self
            .store
            .list_authors()
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let mut nodes = Vec::with_capacity(quotes.len());
        let mut edges = Vec::with_capacity(quotes.len());
        let mut authors_seen: HashSet<AuthorId> = HashSet::new();

        for quote in &quotes {
            let author_name = authors
                .get(&quote.author_id)
                .map(|a| a.name.clone())
                .unwrap_or_default();

            nodes.push(GraphNode {
                id: quote.id,
                label: quote.label(LABEL_MAX_CHARS),
                kind: NodeKind::Quote,
                data: NodeData::Quote {
                    text: quote.text.clone(),
                    author: author_name,
                    umap_x: quote.projection.map(|p| p.x),
                    umap_y: quote.projection.map(|p| p.y),
                    cluster_id: quote.cluster,
                },
            });

            if let Some(author) = authors.get(&quote.author_id) {
                if authors_seen.insert(author.id) {
                    nodes.push(GraphNode {
                        id: author.id,
                        label: author.name.clone(),
                        kind: NodeKind::Author,
                        data: NodeData::Author {
                            name: author.name.clone(),
                            image_url: author.image_url.clone(),
                        },
                    });
                }
            }

            edges.push(GraphLink {
                source: quote.id,
                target: quote.author_id,
                kind: LinkKind::AttributedTo,
                weight: 1.0,
            });
        }

        for edge in self.store.similarity_edges().await? {
            edges.push(GraphLink {
                source: edge.source,
                target: edge.target,
                kind: LinkKind::SimilarTo,
                weight: edge.score,
            });
        }

        Ok(GraphData { nodes, edges })
    }

    /// Derive summary statistics. An empty store yields all zeros.
    pub async fn get_stats(&self) -> CoreResult<GraphStats> {
        let quotes = self.store.list_quotes(QuoteFilter::default()).await?;
        let authors = self.store.list_authors().await?;
        let assignments = self.store.cluster_assignments().await?;
        let edges = self.store.similarity_edges().await?;

        let total_quotes = quotes.len();
        let total_authors = authors.len();
        let avg_quotes_per_author = if total_authors > 0 {
            total_quotes as f64 / total_authors as f64
        } else {
            0.0
        };

        // Top authors by quote count; name breaks ties for determinism.
        let author_names: HashMap<AuthorId, String> =
            authors.into_iter().map(|a| (a.id, a.name)).collect();
        let mut counts: HashMap<AuthorId, usize> = HashMap::new();
        for quote in &quotes {
            *counts.entry(quote.author_id).or_default() += 1;
        }
        let mut top_authors: Vec<AuthorQuoteCount> = counts
            .into_iter()
            .filter_map(|(id, quote_count)| {
                author_names.get(&id).map(|name| AuthorQuoteCount {
                    name: name.clone(),
                    quote_count,
                })
            })
            .collect();
        top_authors.sort_by(|a, b| {
            b.quote_count
                .cmp(&a.quote_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        top_authors.truncate(TOP_AUTHORS);

        // Per-cluster sizes and mean same-cluster edge scores.
        let mut cluster_sizes: HashMap<u32, usize> = HashMap::new();
        for &cluster in assignments.values() {
            *cluster_sizes.entry(cluster).or_default() += 1;
        }
        let mut score_sums: HashMap<u32, (f64, usize)> = HashMap::new();
        for edge in &edges {
            if let (Some(&a), Some(&b)) =
                (assignments.get(&edge.source), assignments.get(&edge.target))
            {
                if a == b {
                    let entry = score_sums.entry(a).or_insert((0.0, 0));
                    entry.0 += edge.score as f64;
                    entry.1 += 1;
                }
            }
        }

        let mut cluster_distribution: Vec<ClusterStats> = cluster_sizes
            .iter()
            .map(|(&cluster_id, &quote_count)| {
                let avg_similarity = score_sums
                    .get(&cluster_id)
                    .map(|&(sum, n)| (sum / n as f64) as f32)
                    .unwrap_or(0.0);
                ClusterStats {
                    cluster_id,
                    quote_count,
                    avg_similarity,
                }
            })
            .collect();
        cluster_distribution.sort_by_key(|c| c.cluster_id);

        let total_clusters = cluster_distribution.len();
        let assigned: usize = cluster_distribution.iter().map(|c| c.quote_count).sum();
        let avg_cluster_size = if total_clusters > 0 {
            assigned as f64 / total_clusters as f64
        } else {
            0.0
        };

        Ok(GraphStats {
            total_quotes,
            total_authors,
            avg_quotes_per_author,
            top_authors,
            total_clusters,
            cluster_distribution,
            avg_cluster_size,
        })
    }
}
