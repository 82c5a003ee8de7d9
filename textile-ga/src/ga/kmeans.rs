use anyhow::{Result, ensure};
use log::trace;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::Rng;

/// Result of a k-means clustering
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster of every data point
    pub labels: Vec<usize>,
    /// One row per cluster
    pub centroids: Array2<f64>,
    pub n_iterations: usize,
}

/// Clusters the rows of `data` into `k` clusters.
///
/// Centroids are seeded with k-means++ and refined with Lloyd's algorithm until the assignment
/// no longer changes or `max_iterations` is reached.
/// Every cluster ends up with at least one point: an empty cluster takes over the point
/// furthest from its centroid among the clusters with more than one point.
pub fn kmeans(data: &Array2<f64>, k: usize, max_iterations: usize, rng: &mut impl Rng) -> Result<KMeansResult> {
    let n = data.nrows();
    ensure!(
        k >= 1 && k <= n,
        "cannot form {k} clusters out of {n} data points"
    );

    let mut centroids = init_plus_plus(data, k, rng);
    let mut labels = assign(data, &centroids);
    fill_empty_clusters(data, &centroids, &mut labels, k);
    centroids = update_centroids(data, &labels, k);

    let mut n_iterations = 1;
    while n_iterations < max_iterations {
        let mut new_labels = assign(data, &centroids);
        fill_empty_clusters(data, &centroids, &mut new_labels, k);
        n_iterations += 1;
        if new_labels == labels {
            break;
        }
        labels = new_labels;
        centroids = update_centroids(data, &labels, k);
    }
    trace!("[GA] k-means converged after {n_iterations} iterations");

    Ok(KMeansResult {
        labels,
        centroids,
        n_iterations,
    })
}

fn sq_dist(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

fn init_plus_plus(data: &Array2<f64>, k: usize, rng: &mut impl Rng) -> Array2<f64> {
    let n = data.nrows();
    let mut chosen = vec![rng.random_range(0..n)];
    let mut min_sq_dists: Array1<f64> = data
        .rows()
        .into_iter()
        .map(|row| sq_dist(row, data.row(chosen[0])))
        .collect();

    while chosen.len() < k {
        let total = min_sq_dists.sum();
        let next = match total > 0.0 {
            true => {
                let target = rng.random::<f64>() * total;
                let mut cumulative = 0.0;
                let mut pick = n - 1;
                for (i, d) in min_sq_dists.iter().enumerate() {
                    cumulative += d;
                    if cumulative > target && *d > 0.0 {
                        pick = i;
                        break;
                    }
                }
                pick
            }
            false => {
                // all remaining points coincide with a centroid
                let free = (0..n).filter(|i| !chosen.contains(i)).collect::<Vec<_>>();
                free[rng.random_range(0..free.len())]
            }
        };
        chosen.push(next);
        for (i, row) in data.rows().into_iter().enumerate() {
            min_sq_dists[i] = f64::min(min_sq_dists[i], sq_dist(row, data.row(next)));
        }
    }

    data.select(Axis(0), &chosen)
}

fn nearest(point: ArrayView1<f64>, centroids: &Array2<f64>) -> (usize, f64) {
    centroids
        .rows()
        .into_iter()
        .map(|c| sq_dist(point, c))
        .enumerate()
        .fold((0, f64::INFINITY), |acc, (i, d)| if d < acc.1 { (i, d) } else { acc })
}

fn assign(data: &Array2<f64>, centroids: &Array2<f64>) -> Vec<usize> {
    data.rows()
        .into_iter()
        .map(|row| nearest(row, centroids).0)
        .collect()
}

fn fill_empty_clusters(data: &Array2<f64>, centroids: &Array2<f64>, labels: &mut [usize], k: usize) {
    let mut counts = vec![0usize; k];
    for &l in labels.iter() {
        counts[l] += 1;
    }
    for c in 0..k {
        if counts[c] > 0 {
            continue;
        }
        let steal = (0..labels.len())
            .filter(|&i| counts[labels[i]] > 1)
            .map(|i| (i, sq_dist(data.row(i), centroids.row(labels[i]))))
            .fold(None, |acc: Option<(usize, f64)>, (i, d)| match acc {
                Some((_, best)) if best >= d => acc,
                _ => Some((i, d)),
            });
        if let Some((i, _)) = steal {
            counts[labels[i]] -= 1;
            labels[i] = c;
            counts[c] = 1;
        }
    }
}

fn update_centroids(data: &Array2<f64>, labels: &[usize], k: usize) -> Array2<f64> {
    let mut sums = Array2::<f64>::zeros((k, data.ncols()));
    let mut counts = vec![0usize; k];
    for (row, &l) in data.rows().into_iter().zip(labels) {
        let mut target = sums.row_mut(l);
        target += &row;
        counts[l] += 1;
    }
    for (c, count) in counts.into_iter().enumerate() {
        if count > 0 {
            sums.row_mut(c).mapv_inplace(|v| v / count as f64);
        }
    }
    sums
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::prelude::SmallRng;

    use super::*;

    #[test]
    fn separates_obvious_clusters() {
        let data = array![
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [10.0, 10.0],
            [10.1, 10.0],
            [10.0, 10.1],
        ];
        let mut rng = SmallRng::seed_from_u64(3);
        let result = kmeans(&data, 2, 100, &mut rng).unwrap();
        let l = &result.labels;
        assert_eq!(l[0], l[1]);
        assert_eq!(l[1], l[2]);
        assert_eq!(l[3], l[4]);
        assert_eq!(l[4], l[5]);
        assert_ne!(l[0], l[3]);
    }

    #[test]
    fn no_cluster_is_left_empty() {
        // duplicate points force the fallback paths
        let data = array![[1.0], [1.0], [1.0], [1.0], [5.0]];
        let mut rng = SmallRng::seed_from_u64(0);
        let result = kmeans(&data, 4, 50, &mut rng).unwrap();
        let used = result.labels.iter().unique().count();
        assert_eq!(used, 4);
    }

    #[test]
    fn too_many_clusters() {
        let data = array![[1.0], [2.0]];
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(kmeans(&data, 3, 10, &mut rng).is_err());
    }
}
