use std::sync::Arc;

use anyhow::{Result, bail, ensure};
use itertools::Itertools;
use rand::Rng;

use crate::entities::{Fabric, Gene, PatternPiece, PieceShape};
use crate::eval::FitnessWeights;
use crate::geometry::Orientation;
use crate::geometry::primitives::Point;
use crate::util::assertions;

#[doc(inline)]
pub use crate::eval::fitness::pieces_bounding_rect;

/// Places every shape with a uniformly random center such that the piece lies within the fabric.
/// With `rotate`, the orientation is drawn uniformly as well. When the drawn orientation does not fit,
/// the next ones (counter-clockwise) are tried.
pub fn random_pieces(fabric: &Fabric, shapes: &[Arc<PieceShape>], rotate: bool, rng: &mut impl Rng) -> Result<Vec<PatternPiece>> {
    shapes
        .iter()
        .map(|shape| {
            let candidates = match rotate {
                true => {
                    let first = rng.random_range(0..4);
                    (0..4).map(|i| Orientation::ALL[(first + i) % 4]).collect_vec()
                }
                false => vec![Orientation::R0],
            };
            let fits = |o: &Orientation| {
                let (w, h) = o.rotated_dims(shape.meta.width, shape.meta.height);
                w <= fabric.width && h <= fabric.height
            };
            let Some(orientation) = candidates.into_iter().find(fits) else {
                bail!(
                    "piece {} ({}×{}) is too large to fit in the {}×{} fabric in any allowed orientation",
                    shape.id,
                    shape.meta.width,
                    shape.meta.height,
                    fabric.width,
                    fabric.height
                );
            };
            let mut piece = PatternPiece::new(shape.clone(), Point::default(), orientation);
            let (w, h) = piece.rotated_dims();
            let rc = piece.relative_center();
            let col = rc.col + rng.random_range(0..=(fabric.width - w) as i64);
            let row = rc.row + rng.random_range(0..=(fabric.height - h) as i64);
            piece.center_origin = Point::new(row, col);
            Ok(piece)
        })
        .collect()
}

/// `n` genes with random placements
pub fn random_genes(
    fabric: &Fabric,
    shapes: &[Arc<PieceShape>],
    n: usize,
    rotate: bool,
    weights: FitnessWeights,
    rng: &mut impl Rng,
) -> Result<Vec<Gene>> {
    (0..n)
        .map(|_| {
            let pieces = random_pieces(fabric, shapes, rotate, rng)?;
            debug_assert!(assertions::pieces_inside_fabric(fabric, &pieces));
            Gene::new(*fabric, pieces, weights)
        })
        .collect()
}

/// Moves the piece back inside the fabric, returns whether it had to be moved.
/// Fails if the piece is larger than the fabric.
pub fn clamp_piece_position(fabric: &Fabric, piece: &mut PatternPiece) -> Result<bool> {
    piece.clamp_into(fabric)
}

/// Clamps all pieces, returns whether any of them had to be moved
pub fn clamp_pieces_position(fabric: &Fabric, pieces: &mut [PatternPiece]) -> Result<bool> {
    let mut clamped = false;
    for piece in pieces.iter_mut() {
        clamped |= clamp_piece_position(fabric, piece)?;
    }
    Ok(clamped)
}

/// Translates all pieces as one block such that their bounding rectangle touches the top-left corner of the fabric
pub fn push_top_left(gene: &Gene) -> Result<Gene> {
    let bounds = gene.bounding_rect();
    let mut pushed = gene.clone();
    if bounds.row_min == 0 && bounds.col_min == 0 {
        return Ok(pushed);
    }
    for i in 0..pushed.n_pieces() {
        pushed.move_piece(i, -bounds.row_min, -bounds.col_min)?;
    }
    Ok(pushed)
}

/// Whether the combined surface of the pieces does not exceed the fabric area.
/// A necessary, not a sufficient condition.
pub fn can_pieces_fit_in_fabric(fabric: &Fabric, shapes: &[Arc<PieceShape>]) -> bool {
    shapes.iter().map(|s| s.meta.surface).sum::<u64>() <= fabric.area()
}

/// Every shape repeated `n_cuts` times, the copies share the shape
pub fn replicate_pieces(shapes: &[Arc<PieceShape>], n_cuts: usize) -> Result<Vec<Arc<PieceShape>>> {
    ensure!(n_cuts >= 1, "n_cuts must be at least 1, got {n_cuts}");
    Ok((0..n_cuts).flat_map(|_| shapes.iter().cloned()).collect())
}
