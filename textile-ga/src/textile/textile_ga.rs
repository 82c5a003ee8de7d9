use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, ensure};
use itertools::Itertools;
use log::info;
use ndarray::Array2;
use rand::prelude::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::entities::{Fabric, Gene, PieceShape, PieceSource};
use crate::eval::fitness;
use crate::ga::{GAProblem, GeneticAlgorithm, Population, ScoreType, ScoredIndividual};
use crate::textile::crossover::{crossover_one_point, crossover_random_pieces};
use crate::textile::distance::{data_vector, distance_matrix, genes_distance};
use crate::textile::mutation::{mutate_and_keep_best, mutate_translate, smart_mutate};
use crate::textile::placement::{can_pieces_fit_in_fabric, push_top_left, random_genes, replicate_pieces};
use crate::textile::{CrossoverStrategy, MutationStrategy, TextileGAConfig};

/// Nesting problem as seen by the [`GeneticAlgorithm`]
#[derive(Debug, Clone)]
pub struct TextileProblem {
    pub config: TextileGAConfig,
}

impl TextileProblem {
    /// Converts a score back into a gene fitness (lower is better)
    pub fn fitness_from_score(&self, score: f64) -> f64 {
        match self.config.ga.score_type {
            ScoreType::Min => score,
            ScoreType::Max => -score,
        }
    }
}

impl GAProblem for TextileProblem {
    type Individual = Gene;

    /// The gene fitness, negated when higher scores are better
    fn score(&self, gene: &mut Gene) -> f64 {
        let fitness = gene.fitness();
        match self.config.ga.score_type {
            ScoreType::Min => fitness,
            ScoreType::Max => -fitness,
        }
    }

    fn crossover(&self, p1: &Gene, p2: &Gene, rng: &mut impl Rng) -> Result<(Gene, Gene)> {
        let fraction = self.config.crossover.min_crossover_fraction;
        match self.config.crossover.strategy {
            CrossoverStrategy::OnePoint => crossover_one_point(p1, p2, fraction, rng),
            CrossoverStrategy::RandomPieces => crossover_random_pieces(p1, p2, fraction, rng),
        }
    }

    fn mutate(&self, gene: &Gene, rng: &mut impl Rng) -> Result<Gene> {
        let mc = &self.config.mutation;
        let pushed;
        let gene = match mc.push_top_left {
            true => {
                pushed = push_top_left(gene)?;
                &pushed
            }
            false => gene,
        };
        match mc.strategy {
            MutationStrategy::Translate => mutate_translate(gene, mc.translation_amplitude, rng),
            MutationStrategy::Smart => Ok(smart_mutate(gene, mc.translation_amplitude, mc.n_iterations)?.gene),
            MutationStrategy::KeepBest => {
                let mut history = mutate_and_keep_best(
                    gene,
                    mc.translation_amplitude,
                    mc.keep_best_population_size,
                    mc.n_iterations,
                    rng,
                )?;
                Ok(history.pop().unwrap_or_else(|| gene.clone()))
            }
        }
    }

    fn distance(&self, a: &ScoredIndividual<Gene>, b: &ScoredIndividual<Gene>) -> Result<f64> {
        genes_distance(&a.data, &b.data, &self.config.distance)
    }

    fn feature_vector(&self, individual: &ScoredIndividual<Gene>) -> Vec<f64> {
        data_vector(&individual.data, true)
    }
}

/// Wall-clock time spent computing generations, in seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTime {
    pub iterations: Vec<f64>,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextileGAStats {
    pub run_time: RunTime,
    /// Packing of the best gene after every generation
    pub packings: Vec<f64>,
}

/// Nests pattern pieces on a fabric by evolving a population of random arrangements.
pub struct TextileGA {
    fabric: Fabric,
    shapes: Vec<Arc<PieceShape>>,
    config: TextileGAConfig,
    ga: GeneticAlgorithm<TextileProblem>,
    stats: TextileGAStats,
}

impl TextileGA {
    /// Sets up a run for `shapes`, each of which is cut `config.n_cuts` times.
    /// Fails when the pieces can not possibly fit in the fabric or when the configuration is invalid.
    pub fn new(fabric: Fabric, shapes: Vec<Arc<PieceShape>>, config: TextileGAConfig) -> Result<Self> {
        let shapes = replicate_pieces(&shapes, config.n_cuts)?;
        ensure!(!shapes.is_empty(), "no pieces to nest");
        ensure!(
            can_pieces_fit_in_fabric(&fabric, &shapes),
            "the pieces cannot fit in the fabric, their surface ({}) is larger than the fabric area ({})",
            shapes.iter().map(|s| s.meta.surface).sum::<u64>(),
            fabric.area()
        );

        let mut rng = match config.prng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let initial_population = random_genes(
            &fabric,
            &shapes,
            config.ga.population_size,
            config.enable_rotation,
            config.fitness_weights,
            &mut rng,
        )?;
        info!(
            "[TGA] nesting {} pieces on a {}×{} fabric, population of {}",
            shapes.len(),
            fabric.width,
            fabric.height,
            config.ga.population_size
        );

        let ga = GeneticAlgorithm::new(TextileProblem { config }, initial_population, config.ga, rng)?;

        Ok(TextileGA {
            fabric,
            shapes,
            config,
            ga,
            stats: TextileGAStats::default(),
        })
    }

    /// Same as [`TextileGA::new`], building the shapes from raw piece descriptions
    pub fn from_sources(fabric: Fabric, sources: Vec<PieceSource>, config: TextileGAConfig) -> Result<Self> {
        let shapes = sources
            .into_iter()
            .enumerate()
            .map(|(id, source)| PieceShape::new(id, source).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        TextileGA::new(fabric, shapes, config)
    }

    pub fn next_generation(&mut self) -> Result<()> {
        let start = Instant::now();
        self.ga.next_generation()?;
        let elapsed = start.elapsed().as_secs_f64();

        self.stats.run_time.iterations.push(elapsed);
        self.stats.run_time.total += elapsed;
        let packing = fitness::packing(self.best_gene().pieces());
        self.stats.packings.push(packing);

        info!(
            "[TGA] generation {} done in {:.3}s, best fitness: {:.5}, packing: {:.3}",
            self.ga.iteration(),
            elapsed,
            self.best_gene().peek_fitness(),
            packing
        );
        Ok(())
    }

    pub fn evolve(&mut self, n_generations: usize) -> Result<()> {
        for _ in 0..n_generations {
            self.next_generation()?;
        }
        Ok(())
    }

    pub fn best_gene(&self) -> &Gene {
        &self.ga.best().data
    }

    /// Fitness of the best gene after every generation
    pub fn best_scores(&self) -> Vec<f64> {
        self.ga
            .best_scored_individuals()
            .iter()
            .map(|s| self.ga.problem().fitness_from_score(s.score))
            .collect()
    }

    /// Fitness of the current elite, best first
    pub fn elite_scores(&self) -> Vec<f64> {
        self.ga
            .elite_scores()
            .into_iter()
            .map(|s| self.ga.problem().fitness_from_score(s))
            .collect()
    }

    pub fn population(&self) -> &Population<Gene> {
        self.ga.population()
    }

    /// Pairwise gene distances over the whole population, elite first
    pub fn distance_matrix(&self) -> Result<Array2<f64>> {
        let genes = self.ga.population().iter().map(|s| &s.data).collect_vec();
        distance_matrix(&genes, &self.config.distance)
    }

    /// See [`data_vector`]
    pub fn data_vector(&self, gene: &Gene, normalize: bool) -> Vec<f64> {
        data_vector(gene, normalize)
    }

    pub fn stats(&self) -> &TextileGAStats {
        &self.stats
    }

    pub fn config(&self) -> &TextileGAConfig {
        &self.config
    }

    pub fn fabric(&self) -> &Fabric {
        &self.fabric
    }

    /// All pieces to nest, including the copies for multiple cuts
    pub fn shapes(&self) -> &[Arc<PieceShape>] {
        &self.shapes
    }

    pub fn ga(&self) -> &GeneticAlgorithm<TextileProblem> {
        &self.ga
    }
}
