use serde::{Deserialize, Serialize};

use crate::entities::{Fabric, OverlapMatrix, PatternPiece};
use crate::eval::overlap;
use crate::geometry::primitives::Rect;
use crate::util::assertions;

/// Weights of the terms making up the fitness score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Penalizes overlapping pixels between pieces
    pub overlap: f64,
    /// Penalizes the length of fabric used (right-most column)
    pub used_length: f64,
    /// Pulls pieces towards the left edge of the fabric
    pub average_column: f64,
    /// Pulls pieces towards the top edge of the fabric
    pub average_row: f64,
    /// Rewards a compact arrangement
    pub packing: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            overlap: 1.0,
            used_length: 0.0,
            average_column: 10.0,
            average_row: 10.0,
            packing: 0.0,
        }
    }
}

/// Mean position of the piece centers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AverageOrigin {
    pub row: f64,
    pub col: f64,
}

/// Breakdown of the fitness of an arrangement.
/// All terms except `packing` are normalized by the fabric dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessData {
    /// Overlapping pixels over the fabric area
    pub overlap_area: f64,
    /// Used length over the fabric width
    pub used_length: f64,
    /// Average center, column over the fabric width and row over the fabric height
    pub average_origin: AverageOrigin,
    /// Surface of the pieces over the area of their bounding rectangle, exceeds 1 when pieces overlap
    pub packing: f64,
    /// Weighted sum of the terms above, lower is better
    pub score: f64,
}

/// Recomputes every stale cell of the matrix
pub fn update_overlap_matrix(matrix: &mut OverlapMatrix, pieces: &[PatternPiece]) {
    debug_assert!(matrix.size() == pieces.len());
    let n = pieces.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if matrix.get(i, j).is_none() {
                matrix.set(i, j, overlap(&pieces[i], &pieces[j]));
            }
        }
    }
}

/// Right-most column occupied by any piece, in pixels
pub fn used_length(pieces: &[PatternPiece]) -> i64 {
    pieces
        .iter()
        .map(|p| p.bbox().col_max)
        .fold(0, i64::max)
}

pub fn average_origin(pieces: &[PatternPiece]) -> AverageOrigin {
    let n = pieces.len() as f64;
    let (sum_row, sum_col) = pieces.iter().fold((0, 0), |(r, c), p| {
        (r + p.center_origin.row, c + p.center_origin.col)
    });
    AverageOrigin {
        row: sum_row as f64 / n,
        col: sum_col as f64 / n,
    }
}

/// Smallest rectangle containing every piece
pub fn pieces_bounding_rect(pieces: &[PatternPiece]) -> Option<Rect> {
    let bboxes = pieces.iter().map(|p| p.bbox()).collect::<Vec<_>>();
    Rect::bounding(&bboxes)
}

pub fn packing(pieces: &[PatternPiece]) -> f64 {
    let total_surface = pieces.iter().map(|p| p.surface()).sum::<u64>();
    match pieces_bounding_rect(pieces) {
        Some(bounds) => total_surface as f64 / bounds.area() as f64,
        None => 0.0,
    }
}

/// Evaluates an arrangement, refreshing the stale cells of its overlap matrix on the way.
pub fn evaluate(
    fabric: &Fabric,
    pieces: &[PatternPiece],
    overlap_matrix: &mut OverlapMatrix,
    weights: &FitnessWeights,
) -> FitnessData {
    update_overlap_matrix(overlap_matrix, pieces);
    debug_assert!(assertions::overlap_matrix_is_correct(overlap_matrix, pieces));

    let overlap_area = overlap_matrix.total() as f64 / fabric.area() as f64;
    let used_length = used_length(pieces) as f64 / fabric.width as f64;
    let avg = average_origin(pieces);
    let average_origin = AverageOrigin {
        row: avg.row / fabric.height as f64,
        col: avg.col / fabric.width as f64,
    };
    let packing = packing(pieces);

    let score = weights.overlap * overlap_area
        + weights.used_length * used_length
        + weights.average_column * average_origin.col
        + weights.average_row * average_origin.row
        + weights.packing * (1.0 - packing);

    FitnessData {
        overlap_area,
        used_length,
        average_origin,
        packing,
        score,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use float_cmp::approx_eq;

    use super::*;
    use crate::entities::{PieceShape, PieceSource};
    use crate::geometry::primitives::Point;
    use crate::geometry::{BitMask, Orientation};

    fn solid(id: usize, width: usize, height: usize, center: Point) -> PatternPiece {
        let mask = BitMask::filled(width, height).unwrap();
        let shape = PieceShape::new(id, PieceSource::from_mask(mask)).unwrap();
        PatternPiece::new(Arc::new(shape), center, Orientation::R0)
    }

    fn all_ones() -> FitnessWeights {
        FitnessWeights {
            overlap: 1.0,
            used_length: 1.0,
            average_column: 1.0,
            average_row: 1.0,
            packing: 1.0,
        }
    }

    #[test]
    fn two_overlapping_rectangles() {
        let fabric = Fabric::new(10, 10).unwrap();
        let pieces = vec![solid(0, 5, 3, Point::new(1, 2)), solid(1, 3, 3, Point::new(1, 1))];
        let mut matrix = OverlapMatrix::new(2);

        let data = evaluate(&fabric, &pieces, &mut matrix, &all_ones());

        assert_eq!(matrix.get(0, 1), Some(9));
        assert!(approx_eq!(f64, data.overlap_area, 0.09, ulps = 4));
        assert!(approx_eq!(f64, data.used_length, 0.5, ulps = 4));
        assert!(approx_eq!(f64, data.average_origin.row, 0.1, ulps = 4));
        assert!(approx_eq!(f64, data.average_origin.col, 0.15, ulps = 4));
        assert!(approx_eq!(f64, data.packing, 24.0 / 15.0, ulps = 4));
        assert!(approx_eq!(f64, data.score, 0.24, epsilon = 1e-12));
    }

    #[test]
    fn default_weights_ignore_used_length_and_packing() {
        let fabric = Fabric::new(10, 10).unwrap();
        let pieces = vec![solid(0, 5, 3, Point::new(1, 2)), solid(1, 3, 3, Point::new(1, 1))];
        let mut matrix = OverlapMatrix::new(2);

        let data = evaluate(&fabric, &pieces, &mut matrix, &FitnessWeights::default());

        // 0.09 + 10 * 0.15 + 10 * 0.1
        assert!(approx_eq!(f64, data.score, 2.59, epsilon = 1e-12));
    }

    #[test]
    fn only_stale_cells_are_recomputed() {
        let pieces = vec![
            solid(0, 2, 2, Point::new(1, 1)),
            solid(1, 2, 2, Point::new(1, 1)),
            solid(2, 2, 2, Point::new(5, 5)),
        ];
        let mut matrix = OverlapMatrix::new(3);
        // a bogus cached value must survive the update
        matrix.set(0, 1, 42);
        update_overlap_matrix(&mut matrix, &pieces);
        assert_eq!(matrix.get(0, 1), Some(42));
        assert_eq!(matrix.get(2, 1), Some(0));
        assert!(matrix.is_up_to_date());
    }

    #[test]
    fn packing_of_two_disjoint_squares() {
        let pieces = vec![solid(0, 2, 2, Point::new(1, 1)), solid(1, 2, 2, Point::new(1, 3))];
        // squares cover columns 0..2 and 2..4 of rows 0..2
        assert!(approx_eq!(f64, packing(&pieces), 1.0, ulps = 2));
        assert_eq!(used_length(&pieces), 4);
    }
}
