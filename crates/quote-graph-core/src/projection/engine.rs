//! Projection engine: lays out the corpus and persists unit-square
//! coordinates.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ProjectionConfig;
use crate::error::CoreResult;
use crate::traits::QuoteStore;
use crate::types::QuoteId;

use super::umap::{umap_defaults, umap_layout, UmapParams};

/// Outcome of a projection pass. Fewer than 2 embedded quotes yields a
/// degraded report with nothing written, never an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionReport {
    pub quotes_projected: usize,
    pub epochs: usize,
}

/// Computes a 2-D layout of the embedded corpus and overwrites the
/// stored projection coordinates.
pub struct ProjectionEngine {
    store: Arc<dyn QuoteStore>,
    params: UmapParams,
}

impl ProjectionEngine {
    pub fn new(store: Arc<dyn QuoteStore>, config: ProjectionConfig) -> Self {
        let params = UmapParams {
            n_neighbors: config.n_neighbors,
            min_dist: config.min_dist,
            n_epochs: config.n_epochs,
            seed: config.seed,
            ..umap_defaults()
        };
        Self { store, params }
    }

    /// Project every embedded quote into the unit square.
    pub async fn project_2d(&self) -> CoreResult<ProjectionReport> {
        let corpus = self.store.all_embeddings().await?;

        if corpus.len() < 2 {
            warn!(
                corpus = corpus.len(),
                "not enough embedded quotes to project, skipping"
            );
            return Ok(ProjectionReport {
                quotes_projected: 0,
                epochs: 0,
            });
        }

        let ids: Vec<QuoteId> = corpus.iter().map(|(id, _)| *id).collect();
        let data: Vec<Vec<f32>> = corpus.into_iter().map(|(_, v)| v).collect();

        let mut layout = umap_layout(&data, &self.params);
        normalize_unit_square(&mut layout);

        let coords: HashMap<QuoteId, (f32, f32)> = ids.into_iter().zip(layout).collect();
        self.store.apply_projections(&coords).await?;

        info!(
            quotes = coords.len(),
            epochs = self.params.n_epochs,
            "projection coordinates updated"
        );

        Ok(ProjectionReport {
            quotes_projected: coords.len(),
            epochs: self.params.n_epochs,
        })
    }
}

/// Min-max normalize both axes independently into [0, 1]. A degenerate
/// axis (all values identical) uses a range of 1.0 instead of dividing
/// by zero, collapsing that axis to 0.
pub fn normalize_unit_square(coords: &mut [(f32, f32)]) {
    if coords.is_empty() {
        return;
    }

    let (mut x_min, mut x_max) = (f32::INFINITY, f32::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f32::INFINITY, f32::NEG_INFINITY);
    for &(x, y) in coords.iter() {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let x_range = if x_max > x_min { x_max - x_min } else { 1.0 };
    let y_range = if y_max > y_min { y_max - y_min } else { 1.0 };

    for (x, y) in coords.iter_mut() {
        *x = (*x - x_min) / x_range;
        *y = (*y - y_min) / y_range;
    }
}
