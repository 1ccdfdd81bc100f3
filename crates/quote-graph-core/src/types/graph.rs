//! Visualization-ready graph shapes produced by the aggregator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full graph payload: one node per quote plus one per referenced author,
/// `attributed_to` and `similar_to` links.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphLink>,
}

/// Node kind discriminator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Quote,
    Author,
}

/// Per-kind node payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NodeData {
    Quote {
        text: String,
        author: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        umap_x: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        umap_y: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cluster_id: Option<u32>,
    },
    Author {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },
}

/// A visualization node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: Uuid,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub data: NodeData,
}

/// Link kind discriminator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    AttributedTo,
    SimilarTo,
}

/// A visualization link. Attribution links carry weight 1.0; similarity
/// links carry the stored cosine score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphLink {
    pub source: Uuid,
    pub target: Uuid,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub weight: f32,
}
