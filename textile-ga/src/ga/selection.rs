use anyhow::{Result, ensure};
use itertools::Itertools;
use rand::Rng;
use rand::seq::index;

use crate::ga::ScoreType;

/// Selection probability of every individual, derived from its score.
///
/// With [`ScoreType::Max`] the weight of a score `s` is `s^exponent`, with [`ScoreType::Min`] it is `(1/s)^exponent`.
/// When a score is not strictly positive these weights are meaningless, in that case the
/// weights are based on the rank instead: the best of `n` individuals weighs `1`, the worst `(1/n)^exponent`.
pub fn probabilities(scores: &[f64], score_type: ScoreType, exponent: f64) -> Vec<f64> {
    if scores.is_empty() {
        return vec![];
    }
    let weights = match scores.iter().all(|&s| s > 0.0 && s.is_finite()) {
        true => scores
            .iter()
            .map(|&s| match score_type {
                ScoreType::Max => s.powf(exponent),
                ScoreType::Min => (1.0 / s).powf(exponent),
            })
            .collect_vec(),
        false => rank_weights(scores, score_type, exponent),
    };
    if let Some(probs) = normalized(&weights) {
        return probs;
    }
    // overflowing score weights, or an exponent extreme enough to break the rank weights as well
    normalized(&rank_weights(scores, score_type, exponent)).unwrap_or_else(|| vec![1.0 / scores.len() as f64; scores.len()])
}

fn normalized(weights: &[f64]) -> Option<Vec<f64>> {
    let total = weights.iter().sum::<f64>();
    match total.is_finite() && total > 0.0 {
        true => Some(weights.iter().map(|w| w / total).collect()),
        false => None,
    }
}

fn rank_weights(scores: &[f64], score_type: ScoreType, exponent: f64) -> Vec<f64> {
    let n = scores.len();
    let mut weights = vec![0.0; n];
    let order = (0..n)
        .sorted_by(|&a, &b| score_type.cmp_best_first(scores[a], scores[b]))
        .collect_vec();
    for (rank, idx) in order.into_iter().enumerate() {
        weights[idx] = ((n - rank) as f64 / n as f64).powf(exponent);
    }
    weights
}

/// Draws `amount` distinct indices in `0..weights.len()`, each with a probability proportional to its weight.
pub fn weighted_distinct_choice(
    rng: &mut impl Rng,
    weights: &[f64],
    amount: usize,
) -> Result<Vec<usize>> {
    ensure!(
        amount <= weights.len(),
        "cannot choose {amount} distinct indices out of {}",
        weights.len()
    );
    if amount == weights.len() {
        return Ok((0..amount).collect());
    }
    let chosen = index::sample_weighted(rng, weights.len(), |i| weights[i], amount)?;
    Ok(chosen.into_vec())
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use rand::SeedableRng;
    use rand::prelude::SmallRng;
    use test_case::test_case;

    use super::*;

    fn assert_probs(actual: Vec<f64>, expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!(approx_eq!(f64, *a, *e, ulps = 4), "{actual:?} != {expected:?}");
        }
    }

    #[test_case(&[2.0, 4.0, 6.0], ScoreType::Max, 1.0, &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 2.0]; "proportional")]
    #[test_case(&[1.0, 2.0, 4.0], ScoreType::Max, 1.0, &[1.0 / 7.0, 2.0 / 7.0, 4.0 / 7.0]; "proportional 2")]
    #[test_case(&[1.0, 2.0, 3.0], ScoreType::Max, 2.0, &[1.0 / 14.0, 4.0 / 14.0, 9.0 / 14.0]; "squared")]
    #[test_case(&[1.0, 2.0, 4.0], ScoreType::Min, 1.0, &[4.0 / 7.0, 2.0 / 7.0, 1.0 / 7.0]; "inverse for min")]
    #[test_case(&[1.0, 5.0, 9.0], ScoreType::Max, 0.0, &[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]; "uniform")]
    fn score_based_probabilities(scores: &[f64], score_type: ScoreType, exponent: f64, expected: &[f64]) {
        assert_probs(probabilities(scores, score_type, exponent), expected);
    }

    #[test]
    fn negative_scores_fall_back_to_ranks() {
        let probs = probabilities(&[-3.0, -1.0, -2.0], ScoreType::Max, 1.0);
        assert_probs(probs, &[1.0 / 6.0, 3.0 / 6.0, 2.0 / 6.0]);
    }

    #[test]
    fn overflowing_weights_stay_finite() {
        let probs = probabilities(&[1e300, 1e300, 1e300], ScoreType::Max, 2.0);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(approx_eq!(f64, probs.iter().sum::<f64>(), 1.0, epsilon = 1e-12));

        let probs = probabilities(&[-3.0, -1.0, -2.0], ScoreType::Max, 1e6);
        assert_probs(probs, &[0.0, 1.0, 0.0]);

        let probs = probabilities(&[-3.0, -1.0, -2.0], ScoreType::Max, -1e6);
        assert_probs(probs, &[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]);
    }

    #[test]
    fn weighted_choice_is_distinct() {
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..100 {
            let chosen = weighted_distinct_choice(&mut rng, &[0.1, 0.7, 0.1, 0.1], 2).unwrap();
            assert_eq!(chosen.len(), 2);
            assert_ne!(chosen[0], chosen[1]);
            assert!(chosen.iter().all(|&i| i < 4));
        }
        assert!(weighted_distinct_choice(&mut rng, &[1.0], 2).is_err());
        assert_eq!(weighted_distinct_choice(&mut rng, &[1.0, 1.0], 2).unwrap(), vec![0, 1]);
    }
}
