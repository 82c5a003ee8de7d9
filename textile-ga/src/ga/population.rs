use anyhow::{Result, ensure};
use log::debug;

use crate::ga::{GAProblem, ScoreType, ScoredIndividual};

/// Population split into an elite (best first) and a diverse part.
///
/// `min_distances_to_elite[i]` caches the distance from `diverse[i]` to its closest elite individual.
#[derive(Debug, Clone)]
pub struct Population<T> {
    pub elite: Vec<ScoredIndividual<T>>,
    pub diverse: Vec<ScoredIndividual<T>>,
    pub min_distances_to_elite: Vec<f64>,
}

/// Outcome of [`Population::add_to_population`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Replaced the worst elite individual, now at this index of the (re-sorted) elite
    Elite(usize),
    /// Replaced the least novel diverse individual at this index
    Diverse(usize),
    Rejected,
}

impl<T: Clone> Population<T> {
    /// Splits the individuals into the first `elite_size` and the rest, without sorting.
    /// The minimum distances are left empty.
    pub fn split(mut individuals: Vec<ScoredIndividual<T>>, elite_size: usize) -> Result<Self> {
        ensure!(
            (1..=individuals.len()).contains(&elite_size),
            "size of elite ({elite_size}) must be between 1 and population size ({})",
            individuals.len()
        );
        let diverse = individuals.split_off(elite_size);
        Ok(Population {
            elite: individuals,
            diverse,
            min_distances_to_elite: vec![],
        })
    }

    pub fn len(&self) -> usize {
        self.elite.len() + self.diverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elite followed by the diverse individuals
    pub fn iter(&self) -> impl Iterator<Item = &ScoredIndividual<T>> {
        self.elite.iter().chain(self.diverse.iter())
    }

    pub fn best(&self) -> Option<&ScoredIndividual<T>> {
        self.elite.first()
    }

    /// Index of the elite individual with the worst score, the first one on ties
    pub fn find_worst_elite_index(&self, score_type: ScoreType) -> usize {
        let mut worst = 0;
        for (i, ind) in self.elite.iter().enumerate().skip(1) {
            if score_type.is_better(self.elite[worst].score, ind.score) {
                worst = i;
            }
        }
        worst
    }

    /// Smallest distance from `individual` to any elite individual
    pub fn min_distance_to_elite<P>(&self, problem: &P, individual: &ScoredIndividual<T>) -> Result<f64>
    where
        P: GAProblem<Individual = T>,
    {
        let mut min = f64::INFINITY;
        for elite in &self.elite {
            min = f64::min(min, problem.distance(individual, elite)?);
        }
        Ok(min)
    }

    /// Computes the minimum distances to the elite if they were not computed yet
    pub fn initialise_min_distances<P>(&mut self, problem: &P) -> Result<()>
    where
        P: GAProblem<Individual = T>,
    {
        if self.min_distances_to_elite.len() != self.diverse.len() {
            self.update_min_distances(problem)?;
        }
        Ok(())
    }

    /// Recomputes the minimum distance to the elite of every diverse individual
    pub fn update_min_distances<P>(&mut self, problem: &P) -> Result<()>
    where
        P: GAProblem<Individual = T>,
    {
        self.min_distances_to_elite = self
            .diverse
            .iter()
            .map(|ind| self.min_distance_to_elite(problem, ind))
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    /// Offers a new individual to the population.
    ///
    /// If it beats the worst elite individual, it takes its place and the minimum distances are recomputed.
    /// Otherwise, if it is further from the elite than the least novel diverse individual, it replaces that one.
    pub fn add_to_population<P>(
        &mut self,
        problem: &P,
        score_type: ScoreType,
        candidate: ScoredIndividual<T>,
    ) -> Result<Insertion>
    where
        P: GAProblem<Individual = T>,
    {
        let worst = self.find_worst_elite_index(score_type);
        if score_type.is_better(candidate.score, self.elite[worst].score) {
            debug!(
                "[GA] elite {} ({:.5}) replaced by {:.5}",
                worst, self.elite[worst].score, candidate.score
            );
            let score = candidate.score;
            self.elite[worst] = candidate;
            self.elite
                .sort_by(|a, b| score_type.cmp_best_first(a.score, b.score));
            self.update_min_distances(problem)?;
            let idx = self
                .elite
                .iter()
                .position(|e| e.score == score)
                .unwrap_or(worst);
            return Ok(Insertion::Elite(idx));
        }

        if self.diverse.is_empty() {
            return Ok(Insertion::Rejected);
        }
        self.initialise_min_distances(problem)?;

        let min_distance = self.min_distance_to_elite(problem, &candidate)?;
        let (least_novel, &smallest) = self
            .min_distances_to_elite
            .iter()
            .enumerate()
            .fold((0, &f64::INFINITY), |acc, (i, d)| if d < acc.1 { (i, d) } else { acc });

        if min_distance > smallest {
            debug!(
                "[GA] diverse {} (distance {:.3}) replaced by an individual at distance {:.3}",
                least_novel, smallest, min_distance
            );
            self.diverse[least_novel] = candidate;
            self.min_distances_to_elite[least_novel] = min_distance;
            Ok(Insertion::Diverse(least_novel))
        } else {
            Ok(Insertion::Rejected)
        }
    }
}
