use anyhow::{Result, ensure};
use float_cmp::approx_eq;
use itertools::Itertools;

use crate::entities::{Fabric, OverlapMatrix, PatternPiece};
use crate::eval::fitness;
use crate::eval::{FitnessData, FitnessWeights};
use crate::geometry::Orientation;
use crate::geometry::primitives::{Point, Rect};

/// A candidate arrangement: every piece of the instance with a position and orientation on the fabric.
///
/// The fitness is computed lazily and cached.
/// Moving or rotating a piece through [`Gene::move_piece`], [`Gene::set_piece_origin`] or
/// [`Gene::set_piece_orientation`] only invalidates the overlap cells of that piece.
#[derive(Debug, Clone)]
pub struct Gene {
    fabric: Fabric,
    pieces: Vec<PatternPiece>,
    weights: FitnessWeights,
    overlap_matrix: OverlapMatrix,
    fitness: Option<FitnessData>,
}

impl Gene {
    pub fn new(fabric: Fabric, pieces: Vec<PatternPiece>, weights: FitnessWeights) -> Result<Self> {
        ensure!(!pieces.is_empty(), "a gene needs at least one piece");
        let resolutions = pieces.iter().map(|p| p.meta().resolution).collect_vec();
        ensure!(
            resolutions
                .iter()
                .all(|&r| approx_eq!(f64, r, resolutions[0], ulps = 2)),
            "all pieces of a gene must have the same resolution, got {resolutions:?}"
        );
        let overlap_matrix = OverlapMatrix::new(pieces.len());
        Ok(Gene {
            fabric,
            pieces,
            weights,
            overlap_matrix,
            fitness: None,
        })
    }

    /// New gene on the same fabric with the same weights but with other pieces.
    /// The overlap matrix of the new gene is fully stale.
    pub fn with_pieces(&self, pieces: Vec<PatternPiece>) -> Result<Self> {
        Gene::new(self.fabric, pieces, self.weights)
    }

    pub fn fabric(&self) -> &Fabric {
        &self.fabric
    }

    pub fn pieces(&self) -> &[PatternPiece] {
        &self.pieces
    }

    pub fn n_pieces(&self) -> usize {
        self.pieces.len()
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    pub fn overlap_matrix(&self) -> &OverlapMatrix {
        &self.overlap_matrix
    }

    /// Pixels per cm, shared by all pieces
    pub fn resolution(&self) -> f64 {
        self.pieces[0].meta().resolution
    }

    /// Evaluates the gene if needed and returns its fitness breakdown
    pub fn fitness_data(&mut self) -> &FitnessData {
        let Gene {
            fabric,
            pieces,
            weights,
            overlap_matrix,
            fitness,
        } = self;
        fitness.get_or_insert_with(|| fitness::evaluate(fabric, pieces, overlap_matrix, weights))
    }

    /// Fitness score, lower is better
    pub fn fitness(&mut self) -> f64 {
        self.fitness_data().score
    }

    pub fn cached_fitness(&self) -> Option<f64> {
        self.fitness.map(|f| f.score)
    }

    pub fn cached_fitness_data(&self) -> Option<&FitnessData> {
        self.fitness.as_ref()
    }

    /// Fitness without updating the caches of `self`
    pub fn peek_fitness(&self) -> f64 {
        match self.fitness {
            Some(f) => f.score,
            None => self.clone().fitness(),
        }
    }

    /// Translates piece `i` and clamps it back inside the fabric.
    /// Returns whether clamping was necessary.
    pub fn move_piece(&mut self, i: usize, d_row: i64, d_col: i64) -> Result<bool> {
        ensure!(i < self.pieces.len(), "piece index {i} out of range");
        let target = self.pieces[i].center_origin.translate(d_row, d_col);
        self.set_piece_origin(i, target)
    }

    /// Places the center of piece `i` at `center_origin` and clamps it inside the fabric.
    /// Returns whether clamping was necessary.
    pub fn set_piece_origin(&mut self, i: usize, center_origin: Point) -> Result<bool> {
        ensure!(i < self.pieces.len(), "piece index {i} out of range");
        let mut moved = self.pieces[i].clone();
        moved.center_origin = center_origin;
        let clamped = moved.clamp_into(&self.fabric)?;
        if moved.center_origin != self.pieces[i].center_origin {
            self.pieces[i] = moved;
            self.invalidate(i);
        }
        Ok(clamped)
    }

    /// Rotates piece `i` around its center and clamps it inside the fabric.
    /// Returns whether clamping was necessary.
    pub fn set_piece_orientation(&mut self, i: usize, orientation: Orientation) -> Result<bool> {
        ensure!(i < self.pieces.len(), "piece index {i} out of range");
        if self.pieces[i].orientation == orientation {
            return Ok(false);
        }
        let mut rotated = self.pieces[i].clone();
        rotated.orientation = orientation;
        let clamped = rotated.clamp_into(&self.fabric)?;
        self.pieces[i] = rotated;
        self.invalidate(i);
        Ok(clamped)
    }

    /// Smallest rectangle containing every piece
    pub fn bounding_rect(&self) -> Rect {
        fitness::pieces_bounding_rect(&self.pieces).unwrap_or(self.fabric.rect())
    }

    fn invalidate(&mut self, i: usize) {
        self.overlap_matrix.invalidate(i);
        self.fitness = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use float_cmp::approx_eq;

    use super::*;
    use crate::entities::{PieceShape, PieceSource};
    use crate::geometry::BitMask;

    fn solid(id: usize, width: usize, height: usize, center: Point) -> PatternPiece {
        let mask = BitMask::filled(width, height).unwrap();
        let shape = PieceShape::new(id, PieceSource::from_mask(mask)).unwrap();
        PatternPiece::new(Arc::new(shape), center, Orientation::R0)
    }

    fn gene() -> Gene {
        let fabric = Fabric::new(10, 10).unwrap();
        let pieces = vec![
            solid(0, 3, 3, Point::new(1, 1)),
            solid(1, 3, 3, Point::new(2, 2)),
            solid(2, 2, 2, Point::new(8, 8)),
        ];
        Gene::new(fabric, pieces, FitnessWeights::default()).unwrap()
    }

    #[test]
    fn moving_a_piece_only_invalidates_its_cells() {
        let mut g = gene();
        g.fitness();
        assert!(g.overlap_matrix().is_up_to_date());
        assert_eq!(g.overlap_matrix().get(0, 1), Some(4));

        assert!(!g.move_piece(2, -1, 0).unwrap());
        assert!(g.cached_fitness().is_none());
        assert_eq!(g.overlap_matrix().get(0, 1), Some(4));
        assert_eq!(g.overlap_matrix().get(0, 2), None);
        assert_eq!(g.overlap_matrix().get(1, 2), None);
    }

    #[test]
    fn cached_fitness_matches_fresh_evaluation() {
        let mut g = gene();
        g.fitness();
        g.move_piece(1, 3, 0).unwrap();
        g.set_piece_orientation(0, Orientation::R90).unwrap();
        let incremental = g.fitness();

        let mut fresh = g.with_pieces(g.pieces().to_vec()).unwrap();
        assert!(approx_eq!(f64, incremental, fresh.fitness(), ulps = 2));
    }

    #[test]
    fn moves_are_clamped() {
        let mut g = gene();
        assert!(g.move_piece(0, -5, 100).unwrap());
        assert_eq!(g.pieces()[0].center_origin, Point::new(1, 8));
    }

    #[test]
    fn clamped_to_same_position_keeps_cache() {
        let mut g = gene();
        g.fitness();
        assert!(g.move_piece(0, -1, 0).unwrap());
        assert!(g.cached_fitness().is_some());
    }

    #[test]
    fn clones_do_not_share_caches() {
        let mut g = gene();
        g.fitness();
        let mut clone = g.clone();
        clone.move_piece(2, -4, -4).unwrap();
        assert!(g.cached_fitness().is_some());
        assert!(g.overlap_matrix().is_up_to_date());
        assert!(!clone.overlap_matrix().is_up_to_date());
    }

    #[test]
    fn failed_placement_leaves_gene_untouched() {
        let fabric = Fabric::new(4, 2).unwrap();
        let pieces = vec![solid(0, 4, 1, Point::new(0, 2)), solid(1, 2, 2, Point::new(1, 1))];
        let mut g = Gene::new(fabric, pieces, FitnessWeights::default()).unwrap();
        let fitness = g.fitness();

        // standing upright, the bar is taller than the fabric
        assert!(g.set_piece_orientation(0, Orientation::R90).is_err());
        assert_eq!(g.pieces()[0].orientation, Orientation::R0);
        assert_eq!(g.pieces()[0].center_origin, Point::new(0, 2));
        assert_eq!(g.cached_fitness(), Some(fitness));
        assert!(g.overlap_matrix().is_up_to_date());

        let mut wide = Gene::new(fabric, vec![solid(0, 5, 1, Point::new(0, 2))], FitnessWeights::default()).unwrap();
        assert!(wide.set_piece_origin(0, Point::new(1, 1)).is_err());
        assert_eq!(wide.pieces()[0].center_origin, Point::new(0, 2));
    }

    #[test]
    fn mixed_resolutions_are_rejected() {
        let fabric = Fabric::new(10, 10).unwrap();
        let mut source = PieceSource::from_mask(BitMask::filled(2, 2).unwrap());
        source.resolution = Some(20.0);
        let hi_res = PatternPiece::new(
            Arc::new(PieceShape::new(1, source).unwrap()),
            Point::new(1, 1),
            Orientation::R0,
        );
        let pieces = vec![solid(0, 2, 2, Point::new(1, 1)), hi_res];
        assert!(Gene::new(fabric, pieces, FitnessWeights::default()).is_err());
        assert!(Gene::new(fabric, vec![], FitnessWeights::default()).is_err());
    }
}
