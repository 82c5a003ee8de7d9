use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Whether higher or lower scores are better
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreType {
    #[default]
    Max,
    Min,
}

impl ScoreType {
    /// Whether score `a` is strictly better than `b`
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        self.cmp_best_first(a, b) == Ordering::Less
    }

    /// Ordering which sorts the best scores first
    pub fn cmp_best_first(&self, a: f64, b: f64) -> Ordering {
        match self {
            ScoreType::Max => OrderedFloat(b).cmp(&OrderedFloat(a)),
            ScoreType::Min => OrderedFloat(a).cmp(&OrderedFloat(b)),
        }
    }
}

/// How a new generation is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStrategy {
    /// Crossover of score-weighted parent pairs, mutation of everything, then truncation of the merged population
    #[default]
    Default,
    /// Every elite individual is crossed with a random diverse one and each child competes for a single slot
    Smart,
}

/// How the diverse part of the population is refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiversityStrategy {
    /// Uniformly random, without replacement
    #[default]
    Random,
    /// One representative per k-means cluster of the feature vectors
    KMeans,
    /// Greedily maximizes the minimum distance to the elite and to the already selected individuals
    FarthestPoint,
}

/// Configuration of the [`GeneticAlgorithm`](crate::ga::GeneticAlgorithm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GAConfig {
    pub population_size: usize,
    /// Number of best individuals kept every generation, the remainder of the population is kept diverse
    pub elite_size: usize,
    pub enable_crossover: bool,
    pub enable_mutation: bool,
    /// Exponent applied to the scores when computing parent selection probabilities.
    /// 0 gives a uniform distribution.
    pub probability_exponent: f64,
    pub score_type: ScoreType,
    pub generation_strategy: GenerationStrategy,
    pub diversity_strategy: DiversityStrategy,
    pub kmeans_max_iterations: usize,
}

impl GAConfig {
    pub fn n_diverse(&self) -> usize {
        self.population_size.saturating_sub(self.elite_size)
    }
}

impl Default for GAConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            elite_size: 5,
            enable_crossover: true,
            enable_mutation: true,
            probability_exponent: 1.0,
            score_type: ScoreType::Max,
            generation_strategy: GenerationStrategy::Default,
            diversity_strategy: DiversityStrategy::Random,
            kmeans_max_iterations: 100,
        }
    }
}
