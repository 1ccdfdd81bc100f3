//! Seeded k-means with k-means++ initialization and random restarts.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// K-means parameters.
#[derive(Debug, Clone)]
pub struct KMeansParams {
    /// Number of clusters
    pub n_clusters: usize,
    /// Random restarts; the lowest-inertia run is kept
    pub n_init: usize,
    /// Iteration cap per restart
    pub max_iter: usize,
    /// Convergence threshold on the maximum centroid shift
    pub tolerance: f32,
    /// Base RNG seed; restart r runs with seed + r
    pub seed: u64,
}

/// Default parameters: 10 restarts, 500 iterations, seed 42.
pub fn kmeans_defaults(n_clusters: usize) -> KMeansParams {
    KMeansParams {
        n_clusters,
        n_init: 10,
        max_iter: 500,
        tolerance: 1e-4,
        seed: 42,
    }
}

/// Result of a k-means run.
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster label per input row, in [0, n_clusters)
    pub labels: Vec<u32>,
    /// Sum of squared distances to assigned centroids
    pub inertia: f32,
    /// Lloyd iterations of the winning restart
    pub iterations: usize,
}

/// L2-normalize a vector in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[inline]
fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Run k-means over `data` with `params.n_init` seeded restarts, keeping
/// the lowest-inertia result.
///
/// Requires `data.len() >= params.n_clusters >= 1`; callers adjust the
/// cluster count for small corpora before getting here.
pub fn run_kmeans(data: &[Vec<f32>], params: &KMeansParams) -> KMeansResult {
    debug_assert!(params.n_clusters >= 1);
    debug_assert!(data.len() >= params.n_clusters);

    let mut best: Option<KMeansResult> = None;
    for restart in 0..params.n_init.max(1) {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(restart as u64));
        let result = kmeans_single(data, params, &mut rng);
        let better = match &best {
            Some(b) => result.inertia < b.inertia,
            None => true,
        };
        if better {
            best = Some(result);
        }
    }
    // n_init is clamped to at least 1 above.
    best.unwrap()
}

fn kmeans_single(data: &[Vec<f32>], params: &KMeansParams, rng: &mut ChaCha8Rng) -> KMeansResult {
    let k = params.n_clusters;
    let mut centroids = init_plus_plus(data, k, rng);
    let mut labels = vec![0u32; data.len()];
    let mut iterations = 0;

    for iter in 0..params.max_iter {
        iterations = iter + 1;

        // Assignment step.
        for (i, point) in data.iter().enumerate() {
            let mut best_c = 0usize;
            let mut best_d = f32::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let d = squared_distance(point, centroid);
                if d < best_d {
                    best_d = d;
                    best_c = c;
                }
            }
            labels[i] = best_c as u32;
        }

        // Update step.
        let dim = data[0].len();
        let mut sums = vec![vec![0.0f32; dim]; k];
        let mut counts = vec![0usize; k];
        for (point, &label) in data.iter().zip(labels.iter()) {
            let c = label as usize;
            counts[c] += 1;
            for (s, x) in sums[c].iter_mut().zip(point.iter()) {
                *s += x;
            }
        }

        let mut max_shift = 0.0f32;
        for c in 0..k {
            if counts[c] == 0 {
                // Reseed an emptied cluster to the point farthest from
                // its current centroid.
                let farthest = data
                    .iter()
                    .enumerate()
                    .max_by(|(_, a), (_, b)| {
                        squared_distance(a, &centroids[c])
                            .partial_cmp(&squared_distance(b, &centroids[c]))
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .map(|(i, _)| i)
                    .unwrap_or_else(|| rng.gen_range(0..data.len()));
                let shift = squared_distance(&centroids[c], &data[farthest]).sqrt();
                centroids[c] = data[farthest].clone();
                max_shift = max_shift.max(shift);
                continue;
            }
            let mut new_centroid = sums[c].clone();
            for s in new_centroid.iter_mut() {
                *s /= counts[c] as f32;
            }
            let shift = squared_distance(&centroids[c], &new_centroid).sqrt();
            max_shift = max_shift.max(shift);
            centroids[c] = new_centroid;
        }

        if max_shift < params.tolerance {
            break;
        }
    }

    // Final assignment against the converged centroids.
    let mut inertia = 0.0f32;
    for (i, point) in data.iter().enumerate() {
        let mut best_c = 0usize;
        let mut best_d = f32::INFINITY;
        for (c, centroid) in centroids.iter().enumerate() {
            let d = squared_distance(point, centroid);
            if d < best_d {
                best_d = d;
                best_c = c;
            }
        }
        labels[i] = best_c as u32;
        inertia += best_d;
    }

    KMeansResult {
        labels,
        inertia,
        iterations,
    }
}

/// K-means++ seeding: first centroid uniform, each following centroid
/// sampled proportionally to squared distance from the nearest chosen one.
fn init_plus_plus(data: &[Vec<f32>], k: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f32>> {
    let first = rng.gen_range(0..data.len());
    let mut centroids = vec![data[first].clone()];
    let mut dist2: Vec<f32> = data
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f32 = dist2.iter().sum();
        let next = if total <= f32::EPSILON {
            // All remaining points coincide with a centroid.
            rng.gen_range(0..data.len())
        } else {
            let mut r = rng.gen::<f32>() * total;
            let mut chosen = data.len() - 1;
            for (i, d) in dist2.iter().enumerate() {
                r -= d;
                if r <= 0.0 {
                    chosen = i;
                    break;
                }
            }
            chosen
        };
        centroids.push(data[next].clone());
        for (d, p) in dist2.iter_mut().zip(data.iter()) {
            let nd = squared_distance(p, centroids.last().unwrap());
            if nd < *d {
                *d = nd;
            }
        }
    }
    centroids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blob_corpus() -> Vec<Vec<f32>> {
        let mut data = Vec::new();
        for i in 0..10 {
            let jitter = i as f32 * 0.001;
            data.push(vec![1.0, jitter, 0.0]);
            data.push(vec![-1.0, 0.0, jitter]);
        }
        for v in data.iter_mut() {
            l2_normalize(v);
        }
        data
    }

    #[test]
    fn test_l2_normalize_unit_norm() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_leaves_zero_vector() {
        let mut v = vec![0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0]);
    }

    #[test]
    fn test_kmeans_separates_two_blobs() {
        let data = two_blob_corpus();
        let result = run_kmeans(&data, &kmeans_defaults(2));

        assert_eq!(result.labels.len(), data.len());
        // Even indices are one blob, odd the other; all members of a blob
        // must share a label and the blobs must differ.
        let blob_a = result.labels[0];
        let blob_b = result.labels[1];
        assert_ne!(blob_a, blob_b);
        for (i, &label) in result.labels.iter().enumerate() {
            let expected = if i % 2 == 0 { blob_a } else { blob_b };
            assert_eq!(label, expected, "point {i} misassigned");
        }
    }

    #[test]
    fn test_kmeans_labels_within_range() {
        let data = two_blob_corpus();
        let result = run_kmeans(&data, &kmeans_defaults(4));
        assert!(result.labels.iter().all(|&l| l < 4));
    }

    #[test]
    fn test_kmeans_is_reproducible() {
        let data = two_blob_corpus();
        let params = kmeans_defaults(3);
        let a = run_kmeans(&data, &params);
        let b = run_kmeans(&data, &params);
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn test_kmeans_identical_points_do_not_hang() {
        let data = vec![vec![1.0, 0.0]; 6];
        let result = run_kmeans(&data, &kmeans_defaults(2));
        assert_eq!(result.labels.len(), 6);
        assert!(result.inertia < 1e-3);
    }
}
