//! Checks on the state of the algorithm, used in `debug_assert!()` blocks

use log::error;

use crate::entities::{Fabric, OverlapMatrix, PatternPiece};
use crate::eval::overlap;
use crate::ga::{GAConfig, Population, ScoreType};

pub fn population_matches_config<T>(population: &Population<T>, config: &GAConfig) -> bool {
    let Population {
        elite,
        diverse,
        min_distances_to_elite,
    } = population;

    if elite.len() != config.elite_size || diverse.len() != config.n_diverse() {
        error!(
            "population has {} elite and {} diverse individuals, expected {} and {}",
            elite.len(),
            diverse.len(),
            config.elite_size,
            config.n_diverse()
        );
        return false;
    }
    min_distances_to_elite.len() == diverse.len()
}

pub fn elite_is_sorted<T>(population: &Population<T>, score_type: ScoreType) -> bool {
    population
        .elite
        .windows(2)
        .all(|w| !score_type.is_better(w[1].score, w[0].score))
}

pub fn best_scores_never_worsen(best_scores: &[f64], score_type: ScoreType) -> bool {
    best_scores
        .windows(2)
        .all(|w| !score_type.is_better(w[0], w[1]))
}

/// Every cell of the matrix is up to date and matches a fresh overlap computation
pub fn overlap_matrix_is_correct(matrix: &OverlapMatrix, pieces: &[PatternPiece]) -> bool {
    let n = pieces.len();
    if matrix.size() != n {
        return false;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            let expected = overlap(&pieces[i], &pieces[j]);
            if matrix.get(i, j) != Some(expected) || matrix.get(j, i) != Some(expected) {
                error!(
                    "overlap between pieces {i} and {j} is cached as {:?}, expected {expected}",
                    matrix.get(i, j)
                );
                return false;
            }
        }
    }
    true
}

pub fn pieces_inside_fabric(fabric: &Fabric, pieces: &[PatternPiece]) -> bool {
    pieces.iter().all(|p| p.fits_in(fabric))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_histories() {
        assert!(best_scores_never_worsen(&[1.0, 2.0, 2.0, 5.0], ScoreType::Max));
        assert!(!best_scores_never_worsen(&[1.0, 3.0, 2.0], ScoreType::Max));
        assert!(best_scores_never_worsen(&[5.0, 4.0, 4.0], ScoreType::Min));
        assert!(best_scores_never_worsen(&[], ScoreType::Min));
    }
}
