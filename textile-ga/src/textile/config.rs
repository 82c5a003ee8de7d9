use serde::{Deserialize, Serialize};

use crate::eval::FitnessWeights;
use crate::ga::{DiversityStrategy, GAConfig};

/// Configuration of a [`TextileGA`](crate::textile::TextileGA) run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextileGAConfig {
    /// Seed for the PRNG. If undefined, the algorithm runs in non-deterministic mode using entropy
    pub prng_seed: Option<u64>,
    /// Number of times every piece has to be cut from the fabric
    pub n_cuts: usize,
    /// Allow pieces to be rotated by multiples of 90 degrees
    pub enable_rotation: bool,
    pub ga: GAConfig,
    pub fitness_weights: FitnessWeights,
    pub mutation: MutationConfig,
    pub crossover: CrossoverConfig,
    pub distance: DistanceConfig,
}

impl Default for TextileGAConfig {
    fn default() -> Self {
        Self {
            prng_seed: None,
            n_cuts: 1,
            enable_rotation: false,
            ga: GAConfig {
                diversity_strategy: DiversityStrategy::KMeans,
                ..GAConfig::default()
            },
            fitness_weights: FitnessWeights::default(),
            mutation: MutationConfig::default(),
            crossover: CrossoverConfig::default(),
            distance: DistanceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStrategy {
    /// Every piece moves by -a, 0 or +a along each axis
    Translate,
    /// Hill climbing, piece by piece and direction by direction
    #[default]
    Smart,
    /// Repeatedly keeps the best of a batch of random translations
    KeepBest,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    pub strategy: MutationStrategy,
    /// Translation step in pixels
    pub translation_amplitude: i64,
    /// Passes of the smart mutation, or generations of the keep-best mutation
    pub n_iterations: usize,
    /// Number of mutants generated every generation of the keep-best mutation
    pub keep_best_population_size: usize,
    /// Move all pieces as a block to the top-left corner before mutating
    pub push_top_left: bool,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            strategy: MutationStrategy::Smart,
            translation_amplitude: 10,
            n_iterations: 5,
            keep_best_population_size: 10,
            push_top_left: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverStrategy {
    /// Both parents are cut at the same random index and the tails are exchanged
    #[default]
    OnePoint,
    /// A random subset of the pieces is exchanged
    RandomPieces,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverConfig {
    pub strategy: CrossoverStrategy,
    /// For [`CrossoverStrategy::OnePoint`], the fraction of pieces on either end which never acts as cut point.
    /// For [`CrossoverStrategy::RandomPieces`], the fraction of pieces exchanged.
    /// Between 0 and 0.5.
    pub min_crossover_fraction: f64,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            strategy: CrossoverStrategy::OnePoint,
            min_crossover_fraction: 0.0,
        }
    }
}

/// Weights of the gene distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceConfig {
    pub center_weight: f64,
    pub orientation_weight: f64,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            center_weight: 1.0,
            orientation_weight: 100.0,
        }
    }
}
