use anyhow::Result;
use rand::Rng;

/// An individual together with its score
#[derive(Debug, Clone)]
pub struct ScoredIndividual<T> {
    pub data: T,
    pub score: f64,
}

impl<T> ScoredIndividual<T> {
    pub fn new(data: T, score: f64) -> Self {
        ScoredIndividual { data, score }
    }
}

/// Everything the [`GeneticAlgorithm`](crate::ga::GeneticAlgorithm) needs to know about the problem it optimizes.
///
/// Operators never modify their inputs, they return new individuals.
/// All randomness is drawn from the generator passed in, which keeps runs reproducible.
pub trait GAProblem: Sync {
    type Individual: Clone + Send + Sync;

    /// Scores an individual. Whether higher or lower is better is decided by
    /// [`GAConfig::score_type`](crate::ga::GAConfig::score_type).
    /// Takes a mutable reference so individuals can cache their evaluation.
    fn score(&self, individual: &mut Self::Individual) -> f64;

    fn crossover(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        rng: &mut impl Rng,
    ) -> Result<(Self::Individual, Self::Individual)>;

    fn mutate(&self, individual: &Self::Individual, rng: &mut impl Rng) -> Result<Self::Individual>;

    /// Dissimilarity between two individuals, the absolute score difference by default
    fn distance(
        &self,
        a: &ScoredIndividual<Self::Individual>,
        b: &ScoredIndividual<Self::Individual>,
    ) -> Result<f64> {
        Ok((a.score - b.score).abs())
    }

    /// Numeric description of an individual used for clustering, its score by default
    fn feature_vector(&self, individual: &ScoredIndividual<Self::Individual>) -> Vec<f64> {
        vec![individual.score]
    }
}
