//! 2-D visualization layout of the embedding space.

mod engine;
mod umap;

pub use engine::{normalize_unit_square, ProjectionEngine, ProjectionReport};
pub use umap::{umap_defaults, umap_layout, UmapParams};
