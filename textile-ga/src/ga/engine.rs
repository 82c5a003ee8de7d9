use anyhow::{Result, ensure};
use itertools::Itertools;
use log::{debug, info};
use ndarray::Array2;
use rand::Rng;
use rand::prelude::SmallRng;
use rayon::prelude::*;

use crate::ga::diversity::select_diverse;
use crate::ga::selection::{probabilities, weighted_distinct_choice};
use crate::ga::{GAConfig, GAProblem, GenerationStrategy, Insertion, Population, ScoredIndividual};
use crate::util::assertions;

/// Steady-state genetic algorithm which keeps an elite and a diverse part in its population.
///
/// All randomness is drawn from the owned [`SmallRng`], in a fixed order.
/// Only the scoring of freshly created individuals runs in parallel, so equal seeds give equal runs.
pub struct GeneticAlgorithm<P: GAProblem> {
    problem: P,
    config: GAConfig,
    rng: SmallRng,
    population: Population<P::Individual>,
    iteration: usize,
    best_scored_individuals: Vec<ScoredIndividual<P::Individual>>,
}

impl<P: GAProblem> GeneticAlgorithm<P> {
    pub fn new(problem: P, initial_population: Vec<P::Individual>, config: GAConfig, rng: SmallRng) -> Result<Self> {
        ensure!(
            initial_population.len() == config.population_size,
            "initial population size ({}) must match the population size parameter ({})",
            initial_population.len(),
            config.population_size
        );
        ensure!(
            (1..=config.population_size).contains(&config.elite_size),
            "size of elite ({}) must be between 1 and population size ({})",
            config.elite_size,
            config.population_size
        );

        let mut scored = score_all(&problem, initial_population);
        scored.sort_by(|a, b| config.score_type.cmp_best_first(a.score, b.score));
        let mut population = Population::split(scored, config.elite_size)?;
        population.initialise_min_distances(&problem)?;

        info!(
            "[GA] initialized population of {} ({} elite, {} diverse), best score: {:.5}",
            config.population_size,
            population.elite.len(),
            population.diverse.len(),
            population.elite[0].score
        );

        Ok(GeneticAlgorithm {
            problem,
            config,
            rng,
            population,
            iteration: 0,
            best_scored_individuals: vec![],
        })
    }

    /// Computes one generation with the configured [`GenerationStrategy`]
    pub fn next_generation(&mut self) -> Result<()> {
        match self.config.generation_strategy {
            GenerationStrategy::Default => self.default_generation()?,
            GenerationStrategy::Smart => self.smart_generation()?,
        }
        self.iteration += 1;
        if let Some(best) = self.population.best() {
            self.best_scored_individuals.push(best.clone());
        }

        debug_assert!(assertions::population_matches_config(&self.population, &self.config));
        debug_assert!(assertions::elite_is_sorted(&self.population, self.config.score_type));
        debug_assert!(assertions::best_scores_never_worsen(
            &self.best_scores(),
            self.config.score_type
        ));

        info!(
            "[GA] generation {}, elite scores: [{}]",
            self.iteration,
            self.elite_scores().iter().map(|s| format!("{s:.5}")).join(", ")
        );
        Ok(())
    }

    pub fn evolve(&mut self, n_generations: usize) -> Result<()> {
        for _ in 0..n_generations {
            self.next_generation()?;
        }
        Ok(())
    }

    /// Crossover of score-weighted parent pairs, mutation of every original and child,
    /// then the best become the elite and the diverse part is selected from the rest.
    fn default_generation(&mut self) -> Result<()> {
        let score_type = self.config.score_type;
        let current = self.population.iter().cloned().collect_vec();

        let mut offspring = vec![];
        if self.config.enable_crossover && current.len() >= 2 {
            let scores = current.iter().map(|s| s.score).collect_vec();
            let probs = probabilities(&scores, score_type, self.config.probability_exponent);
            let n_crossovers = self.config.population_size / 2;
            debug!("[GA] performing {n_crossovers} crossovers");
            for _ in 0..n_crossovers {
                let parents = weighted_distinct_choice(&mut self.rng, &probs, 2)?;
                let (c1, c2) =
                    self.problem
                        .crossover(&current[parents[0]].data, &current[parents[1]].data, &mut self.rng)?;
                offspring.push(c1);
                offspring.push(c2);
            }
        }

        let new_individuals = match self.config.enable_mutation {
            true => current
                .iter()
                .map(|s| &s.data)
                .chain(offspring.iter())
                .map(|ind| self.problem.mutate(ind, &mut self.rng))
                .collect::<Result<Vec<_>>>()?,
            false => offspring,
        };

        let mut merged = current;
        merged.extend(score_all(&self.problem, new_individuals));
        merged.sort_by(|a, b| score_type.cmp_best_first(a.score, b.score));

        let remainder = merged.split_off(self.config.elite_size);
        let elite = merged;
        let diverse = select_diverse(
            &self.problem,
            self.config.diversity_strategy,
            remainder,
            &elite,
            self.config.n_diverse(),
            self.config.kmeans_max_iterations,
            &mut self.rng,
        )?;

        self.population = Population {
            elite,
            diverse,
            min_distances_to_elite: vec![],
        };
        self.population.update_min_distances(&self.problem)?;
        Ok(())
    }

    /// Every elite individual is crossed with a random diverse individual (or another elite one if there are none),
    /// the children are mutated and offered to the population one by one.
    fn smart_generation(&mut self) -> Result<()> {
        let elite = self.population.elite.clone();
        let diverse = self.population.diverse.clone();

        let mut children = vec![];
        for (i, e) in elite.iter().enumerate() {
            let partner = match (diverse.len(), elite.len()) {
                (0, 1) => None,
                (0, n_elite) => {
                    let j = self.rng.random_range(0..n_elite - 1);
                    Some(&elite[if j >= i { j + 1 } else { j }])
                }
                (n_diverse, _) => Some(&diverse[self.rng.random_range(0..n_diverse)]),
            };
            match (partner, self.config.enable_crossover) {
                (Some(partner), true) => {
                    let (c1, c2) = self.problem.crossover(&e.data, &partner.data, &mut self.rng)?;
                    children.push(c1);
                    children.push(c2);
                }
                _ => children.push(e.data.clone()),
            }
        }

        if self.config.enable_mutation {
            children = children
                .iter()
                .map(|c| self.problem.mutate(c, &mut self.rng))
                .collect::<Result<Vec<_>>>()?;
        }

        let mut n_elite = 0;
        let mut n_diverse = 0;
        for child in score_all(&self.problem, children) {
            match self
                .population
                .add_to_population(&self.problem, self.config.score_type, child)?
            {
                Insertion::Elite(_) => n_elite += 1,
                Insertion::Diverse(_) => n_diverse += 1,
                Insertion::Rejected => {}
            }
        }
        debug!("[GA] smart generation: {n_elite} children entered the elite, {n_diverse} the diverse part");
        Ok(())
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn config(&self) -> &GAConfig {
        &self.config
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn population(&self) -> &Population<P::Individual> {
        &self.population
    }

    pub fn best(&self) -> &ScoredIndividual<P::Individual> {
        &self.population.elite[0]
    }

    /// Best individual after every generation
    pub fn best_scored_individuals(&self) -> &[ScoredIndividual<P::Individual>] {
        &self.best_scored_individuals
    }

    pub fn best_scores(&self) -> Vec<f64> {
        self.best_scored_individuals.iter().map(|s| s.score).collect()
    }

    pub fn elite_scores(&self) -> Vec<f64> {
        self.population.elite.iter().map(|s| s.score).collect()
    }

    /// Pairwise distances between all individuals of the population, elite first
    pub fn distance_matrix(&self) -> Result<Array2<f64>> {
        let individuals = self.population.iter().collect_vec();
        let n = individuals.len();
        let mut matrix = Array2::zeros((n, n));
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.problem.distance(individuals[i], individuals[j])?;
                matrix[[i, j]] = d;
                matrix[[j, i]] = d;
            }
        }
        Ok(matrix)
    }
}

/// Scores individuals in parallel, preserving their order
fn score_all<P: GAProblem>(problem: &P, mut individuals: Vec<P::Individual>) -> Vec<ScoredIndividual<P::Individual>> {
    let scores = individuals
        .par_iter_mut()
        .map(|ind| problem.score(ind))
        .collect::<Vec<_>>();
    individuals
        .into_iter()
        .zip(scores)
        .map(|(data, score)| ScoredIndividual::new(data, score))
        .collect()
}
