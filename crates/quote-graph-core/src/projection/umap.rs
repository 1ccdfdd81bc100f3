//! UMAP-style neighborhood-preserving layout.
//!
//! The pipeline follows the reference algorithm: a cosine-distance k-NN
//! graph, per-point smooth kernel calibration against log2(k),
//! symmetrization into fuzzy edge weights, then SGD over the standard
//! attractive/repulsive gradient pair. Everything is seeded, so a given
//! corpus always produces the same layout.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::similarity::cosine_similarity;

/// Output-space curve parameters fitted for min_dist 0.1, spread 1.0.
const CURVE_A: f32 = 1.577;
const CURVE_B: f32 = 0.895;

/// Gradient components are clipped to this magnitude.
const GRAD_CLIP: f32 = 4.0;

/// Layout parameters.
#[derive(Debug, Clone)]
pub struct UmapParams {
    /// Neighborhood size, capped at corpus size - 1
    pub n_neighbors: usize,
    /// Minimum spacing between embedded points (the curve constants are
    /// fitted for 0.1)
    pub min_dist: f32,
    /// Optimization epochs
    pub n_epochs: usize,
    /// Repulsive samples per attractive update
    pub negative_samples: usize,
    /// Initial SGD learning rate, decayed linearly to zero
    pub learning_rate: f32,
    /// RNG seed
    pub seed: u64,
}

/// Default parameters: 15 neighbors, min_dist 0.1, 200 epochs, seed 42.
pub fn umap_defaults() -> UmapParams {
    UmapParams {
        n_neighbors: 15,
        min_dist: 0.1,
        n_epochs: 200,
        negative_samples: 5,
        learning_rate: 1.0,
        seed: 42,
    }
}

#[inline]
fn clip(x: f32) -> f32 {
    x.clamp(-GRAD_CLIP, GRAD_CLIP)
}

/// Binary-search the kernel bandwidth so the neighbor weights sum to
/// `target` (log2 of the neighborhood size).
fn smooth_knn_sigma(dists: &[f32], rho: f32, target: f32) -> f32 {
    let mut lo = 0.0f32;
    let mut hi = f32::INFINITY;
    let mut mid = 1.0f32;

    for _ in 0..64 {
        let sum: f32 = dists
            .iter()
            .map(|&d| (-((d - rho).max(0.0)) / mid).exp())
            .sum();
        if (sum - target).abs() < 1e-5 {
            break;
        }
        if sum > target {
            hi = mid;
            mid = (lo + hi) / 2.0;
        } else {
            lo = mid;
            mid = if hi.is_infinite() { mid * 2.0 } else { (lo + hi) / 2.0 };
        }
    }
    mid.max(1e-8)
}

/// Compute a 2-D layout for `data`. Coordinates come back in the
/// optimizer's own scale; callers normalize into the unit square.
///
/// Requires at least 2 rows; the engine guards that precondition.
pub fn umap_layout(data: &[Vec<f32>], params: &UmapParams) -> Vec<(f32, f32)> {
    let n = data.len();
    debug_assert!(n >= 2);
    let k = params.n_neighbors.min(n - 1).max(1);

    // k-NN graph under cosine distance.
    let mut neighbors: Vec<Vec<(usize, f32)>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut dists: Vec<(usize, f32)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (j, 1.0 - cosine_similarity(&data[i], &data[j])))
            .collect();
        dists.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        dists.truncate(k);
        neighbors.push(dists);
    }

    // Directed fuzzy membership weights.
    let target = (k as f32).log2().max(1.0);
    let mut directed: HashMap<(usize, usize), f32> = HashMap::new();
    for (i, nbrs) in neighbors.iter().enumerate() {
        let rho = nbrs[0].1;
        let dist_values: Vec<f32> = nbrs.iter().map(|&(_, d)| d).collect();
        let sigma = smooth_knn_sigma(&dist_values, rho, target);
        for &(j, d) in nbrs {
            let w = (-((d - rho).max(0.0)) / sigma).exp();
            directed.insert((i, j), w);
        }
    }

    // Symmetrize with the probabilistic t-conorm: a + b - ab.
    let mut symmetric: HashMap<(usize, usize), f32> = HashMap::new();
    for (&(i, j), &w) in &directed {
        let key = (i.min(j), i.max(j));
        let entry = symmetric.entry(key).or_insert(0.0);
        *entry = *entry + w - *entry * w;
    }
    // HashMap iteration order is not deterministic; a sorted edge list
    // keeps the whole layout reproducible for a fixed seed.
    let mut edges: Vec<(usize, usize, f32)> = symmetric
        .into_iter()
        .map(|((i, j), w)| (i, j, w))
        .collect();
    edges.sort_by_key(|&(i, j, _)| (i, j));

    // Seeded random init in the optimizer's working scale.
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let mut pos: Vec<(f32, f32)> = (0..n)
        .map(|_| {
            (
                rng.gen::<f32>() * 20.0 - 10.0,
                rng.gen::<f32>() * 20.0 - 10.0,
            )
        })
        .collect();

    // Edge sampling schedule: stronger edges are applied more often.
    let max_w = edges.iter().map(|e| e.2).fold(f32::MIN, f32::max).max(1e-8);
    let epochs_per_sample: Vec<f32> = edges.iter().map(|e| max_w / e.2.max(1e-8)).collect();
    let mut next_sample: Vec<f32> = epochs_per_sample.clone();

    for epoch in 1..=params.n_epochs {
        let alpha = params.learning_rate * (1.0 - epoch as f32 / params.n_epochs as f32);

        for (e, &(i, j, _)) in edges.iter().enumerate() {
            if next_sample[e] > epoch as f32 {
                continue;
            }
            next_sample[e] += epochs_per_sample[e];

            // Attractive update along the edge.
            let (dx, dy) = (pos[i].0 - pos[j].0, pos[i].1 - pos[j].1);
            let d2 = dx * dx + dy * dy;
            if d2 > 0.0 {
                let coeff =
                    (-2.0 * CURVE_A * CURVE_B * d2.powf(CURVE_B - 1.0)) / (1.0 + CURVE_A * d2.powf(CURVE_B));
                let gx = clip(coeff * dx) * alpha;
                let gy = clip(coeff * dy) * alpha;
                pos[i].0 += gx;
                pos[i].1 += gy;
                pos[j].0 -= gx;
                pos[j].1 -= gy;
            }

            // Repulsive updates against random points.
            for _ in 0..params.negative_samples {
                let t = rng.gen_range(0..n);
                if t == i || t == j {
                    continue;
                }
                let (dx, dy) = (pos[i].0 - pos[t].0, pos[i].1 - pos[t].1);
                let d2 = dx * dx + dy * dy;
                if d2 <= 0.0 {
                    continue;
                }
                let coeff = (2.0 * CURVE_B) / ((0.001 + d2) * (1.0 + CURVE_A * d2.powf(CURVE_B)));
                pos[i].0 += clip(coeff * dx) * alpha;
                pos[i].1 += clip(coeff * dy) * alpha;
            }
        }
    }

    pos
}
