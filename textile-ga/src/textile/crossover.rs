use anyhow::{Result, ensure};
use log::trace;
use rand::Rng;
use rand::seq::index;

use crate::entities::Gene;

fn check_parents(p1: &Gene, p2: &Gene, fraction: f64) -> Result<()> {
    ensure!(
        p1.n_pieces() == p2.n_pieces(),
        "both parents must have the same number of pieces, got {} and {}",
        p1.n_pieces(),
        p2.n_pieces()
    );
    ensure!(
        (0.0..=0.5).contains(&fraction),
        "crossover fraction must be between 0 and 0.5, got {fraction}"
    );
    Ok(())
}

/// Cut index of a one-point crossover of `len` pieces.
/// Uniform in `[⌈len·f⌉, len − ⌈len·f⌉)`, or `⌈len·f⌉` when that band is empty.
pub fn crossover_index(len: usize, min_fraction: f64, rng: &mut impl Rng) -> usize {
    let min = (len as f64 * min_fraction).ceil() as usize;
    let band = len.saturating_sub(2 * min);
    match band {
        0 => min,
        _ => min + rng.random_range(0..band),
    }
}

/// One-point crossover: the first child gets the head of `p1` and the tail of `p2`, the second child the opposite.
/// Both children start with a fully stale overlap matrix.
pub fn crossover_one_point(p1: &Gene, p2: &Gene, min_fraction: f64, rng: &mut impl Rng) -> Result<(Gene, Gene)> {
    check_parents(p1, p2, min_fraction)?;
    let idx = crossover_index(p1.n_pieces(), min_fraction, rng);
    trace!("[TGA] crossover point: {idx}, genes length: {}", p1.n_pieces());

    let (head1, tail1) = p1.pieces().split_at(idx);
    let (head2, tail2) = p2.pieces().split_at(idx);

    let child1 = p1.with_pieces([head1, tail2].concat())?;
    let child2 = p1.with_pieces([head2, tail1].concat())?;
    Ok((child1, child2))
}

/// Exchanges `round(len·fraction)` randomly chosen pieces between both parents.
pub fn crossover_random_pieces(p1: &Gene, p2: &Gene, fraction: f64, rng: &mut impl Rng) -> Result<(Gene, Gene)> {
    check_parents(p1, p2, fraction)?;
    let len = p1.n_pieces();
    let n_swaps = (len as f64 * fraction).round() as usize;
    let swapped = index::sample(rng, len, n_swaps);
    trace!("[TGA] swapping pieces {:?}", swapped.iter().collect::<Vec<_>>());

    let mut pieces1 = p1.pieces().to_vec();
    let mut pieces2 = p2.pieces().to_vec();
    for i in swapped.iter() {
        std::mem::swap(&mut pieces1[i], &mut pieces2[i]);
    }
    Ok((p1.with_pieces(pieces1)?, p1.with_pieces(pieces2)?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::prelude::SmallRng;
    use test_case::test_case;

    use super::*;
    use crate::entities::{Fabric, PatternPiece, PieceShape, PieceSource};
    use crate::eval::FitnessWeights;
    use crate::geometry::primitives::Point;
    use crate::geometry::{BitMask, Orientation};

    fn parents(len: usize) -> (Gene, Gene) {
        let fabric = Fabric::new(100, 20).unwrap();
        let shapes = (0..len)
            .map(|id| Arc::new(PieceShape::new(id, PieceSource::from_mask(BitMask::filled(3, 3).unwrap())).unwrap()))
            .collect::<Vec<_>>();
        let place = |row: i64| {
            shapes
                .iter()
                .enumerate()
                .map(|(i, s)| PatternPiece::new(s.clone(), Point::new(row, 1 + 3 * i as i64), Orientation::R0))
                .collect::<Vec<_>>()
        };
        let w = FitnessWeights::default();
        (
            Gene::new(fabric, place(1), w).unwrap(),
            Gene::new(fabric, place(10), w).unwrap(),
        )
    }

    fn rows(g: &Gene) -> Vec<i64> {
        g.pieces().iter().map(|p| p.center_origin.row).collect()
    }

    #[test_case(10, 0.0; "no guard band")]
    #[test_case(10, 0.2; "guard band")]
    #[test_case(7, 0.5; "empty band")]
    #[test_case(1, 0.0; "single piece")]
    fn one_point_children_partition_the_parents(len: usize, fraction: f64) {
        let mut rng = SmallRng::seed_from_u64(11);
        let (p1, p2) = parents(len);
        for _ in 0..20 {
            let (c1, c2) = crossover_one_point(&p1, &p2, fraction, &mut rng).unwrap();
            assert_eq!(c1.n_pieces(), len);
            assert_eq!(c2.n_pieces(), len);
            assert_eq!(c1.overlap_matrix().n_stale(), len * (len - 1) / 2);

            let (r1, r2) = (rows(&c1), rows(&c2));
            let idx = r1.iter().position(|&r| r == 10).unwrap_or(len);
            let min = (len as f64 * fraction).ceil() as usize;
            assert!(idx >= min && (idx < len - min || idx == min));
            for i in 0..len {
                // every slot comes from exactly one parent in each child
                assert_ne!(r1[i], r2[i]);
                assert_eq!(r1[i], if i < idx { 1 } else { 10 });
            }
        }
    }

    #[test]
    fn random_pieces_swaps_the_requested_amount() {
        let mut rng = SmallRng::seed_from_u64(5);
        let (p1, p2) = parents(10);
        let (c1, c2) = crossover_random_pieces(&p1, &p2, 0.3, &mut rng).unwrap();
        let swapped = rows(&c1).iter().filter(|&&r| r == 10).count();
        assert_eq!(swapped, 3);
        assert!(rows(&c1).iter().zip(rows(&c2)).all(|(a, b)| *a != b));
        // pieces keep their slot
        assert!(c1.pieces().iter().enumerate().all(|(i, p)| p.id() == i));
    }

    #[test]
    fn invalid_crossovers() {
        let mut rng = SmallRng::seed_from_u64(0);
        let (p1, _) = parents(4);
        let (_, p2) = parents(5);
        assert!(crossover_one_point(&p1, &p2, 0.0, &mut rng).is_err());
        let (p1, p2) = parents(4);
        assert!(crossover_one_point(&p1, &p2, 0.6, &mut rng).is_err());
        assert!(crossover_random_pieces(&p1, &p2, -0.1, &mut rng).is_err());
    }
}
