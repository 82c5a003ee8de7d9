use anyhow::Result;
use log::trace;
use rand::Rng;

use crate::entities::Gene;

/// Direction in which the smart mutation tries to move a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Top,
    Right,
    Bottom,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Top, Direction::Right, Direction::Bottom];

    /// (d_row, d_col) of a step of `amplitude` pixels
    pub fn offset(&self, amplitude: i64) -> (i64, i64) {
        match self {
            Direction::Left => (0, -amplitude),
            Direction::Top => (-amplitude, 0),
            Direction::Right => (0, amplitude),
            Direction::Bottom => (amplitude, 0),
        }
    }
}

/// Moves every piece by `-amplitude`, `0` or `+amplitude` along each axis (drawn uniformly, row first)
/// and clamps it back inside the fabric. The input gene is left untouched.
pub fn mutate_translate(gene: &Gene, amplitude: i64, rng: &mut impl Rng) -> Result<Gene> {
    let mut mutant = gene.clone();
    for i in 0..mutant.n_pieces() {
        let d_row = rng.random_range(-1..=1) * amplitude;
        let d_col = rng.random_range(-1..=1) * amplitude;
        if d_row != 0 || d_col != 0 {
            mutant.move_piece(i, d_row, d_col)?;
        }
    }
    Ok(mutant)
}

/// Outcome of [`smart_mutate`]
#[derive(Debug, Clone)]
pub struct SmartMutation {
    pub gene: Gene,
    /// Whether any step improved the fitness
    pub improved: bool,
    /// Number of passes over all pieces that were performed
    pub n_passes: usize,
}

/// Hill climbing on the piece positions.
///
/// For every piece and every [`Direction`], the piece keeps stepping by `amplitude` as long as the
/// fitness strictly improves and the step did not have to be clamped.
/// Stops after `n_iterations` passes, or earlier when a whole pass brings no improvement.
pub fn smart_mutate(gene: &Gene, amplitude: i64, n_iterations: usize) -> Result<SmartMutation> {
    let mut best = gene.clone();
    let mut best_fitness = best.fitness();
    let mut improved = false;
    let mut n_passes = 0;

    for pass in 0..n_iterations {
        n_passes += 1;
        let mut improved_this_pass = false;
        for i in 0..best.n_pieces() {
            for direction in Direction::ALL {
                let (d_row, d_col) = direction.offset(amplitude);
                loop {
                    let mut candidate = best.clone();
                    let clamped = candidate.move_piece(i, d_row, d_col)?;
                    let fitness = candidate.fitness();
                    if fitness >= best_fitness {
                        break;
                    }
                    best = candidate;
                    best_fitness = fitness;
                    improved_this_pass = true;
                    if clamped {
                        break;
                    }
                }
            }
        }
        improved |= improved_this_pass;
        if !improved_this_pass {
            trace!("[TGA] smart mutation: no improvement in pass {pass}, stopping early");
            break;
        }
    }

    Ok(SmartMutation {
        gene: best,
        improved,
        n_passes,
    })
}

/// Local search by random translations: every generation, `population_size` mutants of the current
/// best gene are created and the best of them and the current gene is kept.
/// Returns the best gene of every generation, the last one being the overall best.
pub fn mutate_and_keep_best(
    gene: &Gene,
    amplitude: i64,
    population_size: usize,
    n_iterations: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Gene>> {
    let mut best = gene.clone();
    best.fitness();
    let mut history = Vec::with_capacity(n_iterations);

    for iteration in 0..n_iterations {
        let mutants = (0..population_size)
            .map(|_| mutate_translate(&best, amplitude, rng))
            .collect::<Result<Vec<_>>>()?;
        // a mutant has to be strictly better to replace the current best
        for mut mutant in mutants {
            if mutant.fitness() < best.peek_fitness() {
                best = mutant;
            }
        }
        trace!("[TGA] keep best, iteration {iteration}: {:.5}", best.peek_fitness());
        history.push(best.clone());
    }
    Ok(history)
}
