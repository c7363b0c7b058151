use gist_core::config::ClusteringConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

/// Cluster label in `[0, k)`.
pub type ClusterId = usize;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusteringError {
    #[error("no points to cluster")]
    EmptyInput,

    #[error("k must be in 1..={n}, got {k}")]
    InvalidK { k: usize, n: usize },

    #[error("point {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("point {index} has no components")]
    ZeroDimension { index: usize },

    #[error("point {index} contains a non-finite value")]
    NonFinite { index: usize },

    #[error("clustering diverged: inertia is {0}")]
    Diverged(f64),
}

/// Result of a (multi-restart) batch K-means run.
#[derive(Debug, Clone)]
pub struct KmeansResult {
    /// Cluster of each input point, aligned with the input slice.
    pub labels: Vec<ClusterId>,
    /// Final centroid vectors, indexed by cluster id. Each is the mean of
    /// the points carrying that label.
    pub centroids: Vec<Vec<f64>>,
    /// Number of clusters.
    pub k: usize,
    /// Number of Lloyd's iterations performed by the winning restart.
    pub iterations: usize,
    /// Sum of squared distances from each point to its assigned centroid.
    pub inertia: f64,
}

impl KmeansResult {
    /// Indices of the points assigned to `cluster`, in input order.
    pub fn members(&self, cluster: ClusterId) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |(_, &label)| label == cluster)
            .map(|(i, _)| i)
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Run seeded K-means with restarts and keep the lowest-inertia solution.
///
/// Every restart draws its k-means++ initialization from one RNG stream
/// seeded with `config.seed`, so identical input and config always produce
/// the same labels. On equal inertia the earlier restart wins.
///
/// # Arguments
/// * `points`: feature vectors, all of the same non-zero dimension
/// * `k`: number of clusters (must be >= 1 and <= points.len())
/// * `config`: seed, restart count, iteration cap and tolerance
pub fn kmeans(
    points: &[Vec<f64>],
    k: usize,
    config: &ClusteringConfig,
) -> Result<KmeansResult, ClusteringError> {
    validate(points, k)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best: Option<KmeansResult> = None;

    for restart in 0..config.restarts.max(1) {
        let result = lloyd(points, k, config.max_iterations.max(1), config.tolerance, &mut rng);
        debug!(
            restart,
            inertia = result.inertia,
            iterations = result.iterations,
            "k-means restart finished"
        );
        if best.as_ref().map_or(true, |b| result.inertia < b.inertia) {
            best = Some(result);
        }
    }

    let best = best.ok_or(ClusteringError::EmptyInput)?;
    if !best.inertia.is_finite() {
        return Err(ClusteringError::Diverged(best.inertia));
    }
    Ok(best)
}

// ── Internal helpers ─────────────────────────────────────────

fn validate(points: &[Vec<f64>], k: usize) -> Result<(), ClusteringError> {
    let first = points.first().ok_or(ClusteringError::EmptyInput)?;
    if k == 0 || k > points.len() {
        return Err(ClusteringError::InvalidK { k, n: points.len() });
    }

    let dim = first.len();
    for (index, point) in points.iter().enumerate() {
        if point.is_empty() {
            return Err(ClusteringError::ZeroDimension { index });
        }
        if point.len() != dim {
            return Err(ClusteringError::DimensionMismatch {
                index,
                expected: dim,
                actual: point.len(),
            });
        }
        if point.iter().any(|v| !v.is_finite()) {
            return Err(ClusteringError::NonFinite { index });
        }
    }
    Ok(())
}

/// One Lloyd's run from a fresh k-means++ initialization.
fn lloyd(
    points: &[Vec<f64>],
    k: usize,
    max_iterations: usize,
    tolerance: f64,
    rng: &mut StdRng,
) -> KmeansResult {
    let n = points.len();
    let dim = points[0].len();

    let mut centroids = kmeanspp_init(points, k, rng);
    let mut labels = vec![0usize; n];
    let mut iterations = 0;

    for _ in 0..max_iterations {
        iterations += 1;

        // Assignment step: assign each point to nearest centroid.
        let mut changed = false;
        for (i, point) in points.iter().enumerate() {
            let nearest = nearest_centroid(point, &centroids);
            if labels[i] != nearest {
                labels[i] = nearest;
                changed = true;
            }
        }
        changed |= fill_empty_clusters(points, &mut labels, &centroids, k);

        // Centroids already equal the member means.
        if !changed && iterations > 1 {
            break;
        }

        let new_centroids = member_means(points, &labels, k, dim);
        let shift: f64 = centroids
            .iter()
            .zip(new_centroids.iter())
            .map(|(old, new)| squared_euclidean(old, new))
            .sum();
        centroids = new_centroids;

        if shift <= tolerance {
            break;
        }
    }

    let inertia = points
        .iter()
        .zip(labels.iter())
        .map(|(point, &label)| squared_euclidean(point, &centroids[label]))
        .sum();

    KmeansResult {
        labels,
        centroids,
        k,
        iterations,
        inertia,
    }
}

/// K-means++ initialization: first centroid uniform, the rest D²-weighted.
fn kmeanspp_init(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)].clone());

    let mut min_dist: Vec<f64> = points
        .iter()
        .map(|p| squared_euclidean(p, &centroids[0]))
        .collect();

    for _ in 1..k {
        let total: f64 = min_dist.iter().sum();
        let next = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = None;
            for (i, &d) in min_dist.iter().enumerate() {
                cumulative += d;
                if d > 0.0 && cumulative > target {
                    chosen = Some(i);
                    break;
                }
            }
            // Rounding can leave the target just past the last positive weight.
            chosen
                .or_else(|| min_dist.iter().rposition(|&d| d > 0.0))
                .unwrap_or(0)
        } else {
            // Every point coincides with a chosen centroid.
            rng.gen_range(0..n)
        };

        let centroid = points[next].clone();
        for (d, p) in min_dist.iter_mut().zip(points.iter()) {
            *d = d.min(squared_euclidean(p, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

/// Give every empty cluster the point farthest from its own centroid, taken
/// from a cluster that keeps at least one member. Returns whether any label
/// moved.
fn fill_empty_clusters(
    points: &[Vec<f64>],
    labels: &mut [ClusterId],
    centroids: &[Vec<f64>],
    k: usize,
) -> bool {
    let mut counts = vec![0usize; k];
    for &label in labels.iter() {
        counts[label] += 1;
    }

    let mut moved = false;
    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }

        let mut farthest: Option<(usize, f64)> = None;
        for (i, point) in points.iter().enumerate() {
            let label = labels[i];
            if counts[label] < 2 {
                continue;
            }
            let dist = squared_euclidean(point, &centroids[label]);
            if farthest.map_or(true, |(_, best)| dist > best) {
                farthest = Some((i, dist));
            }
        }

        if let Some((i, _)) = farthest {
            counts[labels[i]] -= 1;
            labels[i] = empty;
            counts[empty] = 1;
            moved = true;
        }
    }
    moved
}

fn member_means(points: &[Vec<f64>], labels: &[ClusterId], k: usize, dim: usize) -> Vec<Vec<f64>> {
    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels.iter()) {
        counts[label] += 1;
        for (acc, &val) in sums[label].iter_mut().zip(point.iter()) {
            *acc += val;
        }
    }

    for (sum, &count) in sums.iter_mut().zip(counts.iter()) {
        if count > 0 {
            let count = count as f64;
            for val in sum.iter_mut() {
                *val /= count;
            }
        }
    }
    sums
}

/// Find the index of the nearest centroid (lowest index on ties).
fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_euclidean(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
        }
    }
    best_idx
}

/// Squared Euclidean distance.
#[inline]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClusteringConfig {
        ClusteringConfig::default()
    }

    /// Helper: generate points in well-separated clusters for testing.
    fn make_clusters(centers: &[(f64, f64)], points_per_cluster: usize) -> Vec<Vec<f64>> {
        let mut result = Vec::new();
        for &(cx, cy) in centers {
            for i in 0..points_per_cluster {
                let offset = (i as f64) * 0.1;
                result.push(vec![cx + offset, cy + offset]);
            }
        }
        result
    }

    fn assert_grouped(result: &KmeansResult, groups: usize, per_group: usize) {
        let mut seen = Vec::new();
        for g in 0..groups {
            let label = result.labels[g * per_group];
            for i in g * per_group..(g + 1) * per_group {
                assert_eq!(result.labels[i], label, "point {i} left its group");
            }
            assert!(!seen.contains(&label), "group {g} shares a label");
            seen.push(label);
        }
    }

    #[test]
    fn basic_kmeans_two_clusters() {
        let points = make_clusters(&[(0.0, 0.0), (100.0, 100.0)], 10);
        let result = kmeans(&points, 2, &config()).unwrap();

        assert_eq!(result.k, 2);
        assert_eq!(result.centroids.len(), 2);
        assert_eq!(result.labels.len(), 20);
        assert_grouped(&result, 2, 10);
    }

    #[test]
    fn kmeans_single_cluster() {
        let points = make_clusters(&[(5.0, 5.0)], 20);
        let result = kmeans(&points, 1, &config()).unwrap();

        assert_eq!(result.centroids.len(), 1);
        assert!(result.labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn kmeans_three_clusters() {
        let points = make_clusters(&[(0.0, 0.0), (50.0, 50.0), (100.0, 100.0)], 15);
        let result = kmeans(&points, 3, &config()).unwrap();

        assert_eq!(result.labels.len(), 45);
        assert_grouped(&result, 3, 15);
    }

    #[test]
    fn centroids_are_member_means() {
        let points = vec![vec![0.0, 0.0], vec![0.0, 2.0], vec![10.0, 10.0], vec![12.0, 10.0]];
        let result = kmeans(&points, 2, &config()).unwrap();

        let low = result.labels[0];
        let high = result.labels[2];
        assert_eq!(result.centroids[low], vec![0.0, 1.0]);
        assert_eq!(result.centroids[high], vec![11.0, 10.0]);
        assert!((result.inertia - 4.0).abs() < 1e-9);
    }

    #[test]
    fn kmeans_converges_quickly_on_separable_data() {
        let points = make_clusters(&[(0.0, 0.0), (1000.0, 1000.0)], 5);
        let result = kmeans(&points, 2, &config()).unwrap();

        assert!(result.iterations <= 5, "iterations: {}", result.iterations);
    }

    #[test]
    fn same_seed_same_labels() {
        let points = make_clusters(&[(0.0, 0.0), (3.0, 3.0), (6.0, 0.0), (2.0, 8.0)], 6);
        let a = kmeans(&points, 4, &config()).unwrap();
        let b = kmeans(&points, 4, &config()).unwrap();

        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn restarts_never_worse_than_first_run() {
        let points = make_clusters(&[(0.0, 0.0), (4.0, 1.0), (8.0, 0.0), (4.0, 6.0)], 5);
        let single = ClusteringConfig {
            restarts: 1,
            ..config()
        };
        let one = kmeans(&points, 4, &single).unwrap();
        let many = kmeans(&points, 4, &config()).unwrap();

        assert!(many.inertia <= one.inertia);
    }

    #[test]
    fn every_cluster_non_empty_with_duplicates() {
        let points = vec![
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![9.0, 9.0],
        ];
        let result = kmeans(&points, 3, &config()).unwrap();
        let sizes = result.cluster_sizes();

        assert_eq!(sizes.len(), 3);
        assert!(sizes.iter().all(|&s| s >= 1), "sizes = {sizes:?}");
        assert_eq!(sizes.iter().sum::<usize>(), 5);
    }

    #[test]
    fn k_equal_to_n_gives_singletons() {
        let points = vec![vec![0.0], vec![5.0], vec![10.0]];
        let result = kmeans(&points, 3, &config()).unwrap();

        assert_eq!(result.cluster_sizes(), vec![1, 1, 1]);
        assert!(result.inertia.abs() < 1e-12);
    }

    #[test]
    fn members_follow_input_order() {
        let points = make_clusters(&[(0.0, 0.0), (100.0, 100.0)], 3);
        let result = kmeans(&points, 2, &config()).unwrap();
        let low: Vec<usize> = result.members(result.labels[0]).collect();
        assert_eq!(low, vec![0, 1, 2]);
    }

    #[test]
    fn kmeanspp_init_picks_spread_centroids() {
        let points = make_clusters(&[(0.0, 0.0), (100.0, 100.0)], 5);
        let mut rng = StdRng::seed_from_u64(7);
        let centroids = kmeanspp_init(&points, 2, &mut rng);

        assert_eq!(centroids.len(), 2);
        let dist = squared_euclidean(&centroids[0], &centroids[1]);
        assert!(dist > 1000.0, "centroids too close: dist²={}", dist);
    }

    #[test]
    fn kmeans_higher_dimensions() {
        let mut points = Vec::new();
        for i in 0..20 {
            points.push(vec![0.0, 0.0, 0.0, (i as f64) * 0.01]);
        }
        for i in 0..20 {
            points.push(vec![100.0, 100.0, 100.0, 100.0 + (i as f64) * 0.01]);
        }

        let result = kmeans(&points, 2, &config()).unwrap();
        assert_grouped(&result, 2, 20);
    }

    #[test]
    fn rejects_empty_input() {
        let points: Vec<Vec<f64>> = Vec::new();
        assert_eq!(kmeans(&points, 1, &config()).unwrap_err(), ClusteringError::EmptyInput);
    }

    #[test]
    fn rejects_zero_k_and_k_above_n() {
        let points = vec![vec![1.0], vec![2.0]];
        assert_eq!(
            kmeans(&points, 0, &config()).unwrap_err(),
            ClusteringError::InvalidK { k: 0, n: 2 }
        );
        assert_eq!(
            kmeans(&points, 3, &config()).unwrap_err(),
            ClusteringError::InvalidK { k: 3, n: 2 }
        );
    }

    #[test]
    fn rejects_ragged_and_non_finite_points() {
        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            kmeans(&ragged, 1, &config()).unwrap_err(),
            ClusteringError::DimensionMismatch { index: 1, .. }
        ));

        let nan = vec![vec![1.0], vec![f64::NAN]];
        assert_eq!(
            kmeans(&nan, 1, &config()).unwrap_err(),
            ClusteringError::NonFinite { index: 1 }
        );
    }
}
