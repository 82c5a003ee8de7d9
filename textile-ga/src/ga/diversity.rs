use anyhow::{Result, ensure};
use log::debug;
use ndarray::Array2;
use rand::Rng;
use rand::seq::index;

use crate::ga::kmeans::kmeans;
use crate::ga::{DiversityStrategy, GAProblem, ScoredIndividual};

/// Selects `n` individuals out of `candidates` according to `strategy`.
///
/// Requesting more individuals than available is an error, requesting exactly as many returns all of them.
/// `elite` is only used by [`DiversityStrategy::FarthestPoint`].
pub fn select_diverse<P: GAProblem>(
    problem: &P,
    strategy: DiversityStrategy,
    candidates: Vec<ScoredIndividual<P::Individual>>,
    elite: &[ScoredIndividual<P::Individual>],
    n: usize,
    kmeans_max_iterations: usize,
    rng: &mut impl Rng,
) -> Result<Vec<ScoredIndividual<P::Individual>>> {
    ensure!(
        n <= candidates.len(),
        "desired number of distant individuals ({n}) larger than the number of candidates ({})",
        candidates.len()
    );
    if n == candidates.len() {
        return Ok(candidates);
    }
    if n == 0 {
        return Ok(vec![]);
    }

    let selected = match strategy {
        DiversityStrategy::Random => index::sample(rng, candidates.len(), n).into_vec(),
        DiversityStrategy::KMeans => kmeans_representatives(problem, &candidates, n, kmeans_max_iterations, rng)?,
        DiversityStrategy::FarthestPoint => farthest_points(problem, &candidates, elite, n)?,
    };
    debug!("[GA] diverse selection ({strategy:?}): {selected:?}");

    let mut slots = candidates.into_iter().map(Some).collect::<Vec<_>>();
    Ok(selected.into_iter().filter_map(|i| slots[i].take()).collect())
}

/// Clusters the feature vectors into `n` clusters and returns the first member of each cluster
pub fn kmeans_representatives<P: GAProblem>(
    problem: &P,
    candidates: &[ScoredIndividual<P::Individual>],
    n: usize,
    max_iterations: usize,
    rng: &mut impl Rng,
) -> Result<Vec<usize>> {
    let features = candidates
        .iter()
        .map(|c| problem.feature_vector(c))
        .collect::<Vec<_>>();
    let dim = features.first().map_or(0, |f| f.len());
    ensure!(
        features.iter().all(|f| f.len() == dim),
        "all feature vectors must have the same length"
    );
    let data = Array2::from_shape_vec((features.len(), dim), features.concat())?;

    let result = kmeans(&data, n, max_iterations, rng)?;
    let representatives = (0..n)
        .filter_map(|cluster| result.labels.iter().position(|&l| l == cluster))
        .collect::<Vec<_>>();
    ensure!(
        representatives.len() == n,
        "k-means produced {} non-empty clusters instead of {n}",
        representatives.len()
    );
    Ok(representatives)
}

/// Greedy farthest-point selection: repeatedly picks the candidate whose minimum distance to the
/// elite and to the already picked candidates is largest (lowest index on ties).
pub fn farthest_points<P: GAProblem>(
    problem: &P,
    candidates: &[ScoredIndividual<P::Individual>],
    elite: &[ScoredIndividual<P::Individual>],
    n: usize,
) -> Result<Vec<usize>> {
    let mut min_dists = candidates
        .iter()
        .map(|c| {
            elite
                .iter()
                .try_fold(f64::INFINITY, |min, e| Ok::<_, anyhow::Error>(f64::min(min, problem.distance(c, e)?)))
        })
        .collect::<Result<Vec<_>>>()?;
    let mut picked = vec![false; candidates.len()];
    let mut selected = Vec::with_capacity(n);

    while selected.len() < n {
        let next = (0..candidates.len())
            .filter(|&i| !picked[i])
            .fold(None, |acc: Option<usize>, i| match acc {
                Some(best) if min_dists[best] >= min_dists[i] => acc,
                _ => Some(i),
            });
        let Some(next) = next else { break };
        picked[next] = true;
        selected.push(next);
        for i in 0..candidates.len() {
            if !picked[i] {
                let d = problem.distance(&candidates[i], &candidates[next])?;
                min_dists[i] = f64::min(min_dists[i], d);
            }
        }
    }
    Ok(selected)
}
