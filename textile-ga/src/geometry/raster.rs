use anyhow::{Result, ensure};
use ndarray::Array2;

use crate::geometry::Orientation;

/// Binary pixel provider describing the shape of a pattern piece.
pub trait Raster: Clone + Send + Sync {
    /// Number of columns
    fn width(&self) -> usize;

    /// Number of rows
    fn height(&self) -> usize;

    /// Whether pixel (`row`, `col`) belongs to the shape
    fn bit(&self, row: usize, col: usize) -> bool;

    /// A copy of this raster rotated counter-clockwise by `orientation`
    fn rotated(&self, orientation: Orientation) -> Self;

    fn n_set_pixels(&self) -> u64 {
        let mut count = 0;
        for row in 0..self.height() {
            for col in 0..self.width() {
                if self.bit(row, col) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Reads pixel (`row`, `col`) of this raster as if it were rotated by `orientation`,
    /// without materializing the rotated raster.
    #[inline(always)]
    fn bit_oriented(&self, row: usize, col: usize, orientation: Orientation) -> bool {
        let (r, c) = orientation.to_original(row, col, self.width(), self.height());
        self.bit(r, c)
    }
}

/// Dense [`Raster`] backed by an [`Array2<bool>`] of shape `(height, width)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMask {
    bits: Array2<bool>,
}

impl BitMask {
    pub fn new(bits: Array2<bool>) -> Result<Self> {
        let (h, w) = bits.dim();
        ensure!(w > 0 && h > 0, "empty bitmask: {w}×{h}");
        Ok(BitMask { bits })
    }

    /// Fully set `width × height` mask, i.e. a rectangular piece
    pub fn filled(width: usize, height: usize) -> Result<Self> {
        BitMask::new(Array2::from_elem((height, width), true))
    }

    /// Parses a mask from text rows, where `'1'` and `'#'` mark set pixels.
    /// Every other character is an empty pixel.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        ensure!(
            rows.iter().all(|r| r.as_ref().chars().count() == width),
            "all rows of a bitmap must have the same length"
        );
        let mut bits = Array2::from_elem((height, width), false);
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.as_ref().chars().enumerate() {
                bits[[row, col]] = matches!(ch, '1' | '#');
            }
        }
        BitMask::new(bits)
    }

    pub fn bits(&self) -> &Array2<bool> {
        &self.bits
    }

    /// Text rows of the mask, `'#'` for set and `'.'` for empty pixels
    pub fn to_rows(&self) -> Vec<String> {
        self.bits
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|&b| if b { '#' } else { '.' }).collect())
            .collect()
    }
}

impl Raster for BitMask {
    fn width(&self) -> usize {
        self.bits.ncols()
    }

    fn height(&self) -> usize {
        self.bits.nrows()
    }

    #[inline(always)]
    fn bit(&self, row: usize, col: usize) -> bool {
        self.bits[[row, col]]
    }

    fn rotated(&self, orientation: Orientation) -> Self {
        let (w, h) = (self.width(), self.height());
        let (rw, rh) = orientation.rotated_dims(w, h);
        let bits = Array2::from_shape_fn((rh, rw), |(row, col)| {
            let (r, c) = orientation.to_original(row, col, w, h);
            self.bits[[r, c]]
        });
        BitMask { bits }
    }

    fn n_set_pixels(&self) -> u64 {
        self.bits.iter().filter(|&&b| b).count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> BitMask {
        BitMask::from_rows(&["#..", "#..", "###"]).unwrap()
    }

    #[test]
    fn counts_set_pixels() {
        assert_eq!(l_shape().n_set_pixels(), 5);
        assert_eq!(BitMask::filled(5, 3).unwrap().n_set_pixels(), 15);
    }

    #[test]
    fn rotation_by_90_is_counter_clockwise() {
        let mask = BitMask::from_rows(&["##.", "..."]).unwrap();
        let rotated = mask.rotated(Orientation::R90);
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        assert_eq!(rotated.to_rows(), vec!["..", "#.", "#."]);
    }

    #[test]
    fn oriented_read_matches_materialized_rotation() {
        let mask = l_shape();
        for o in Orientation::ALL {
            let rotated = mask.rotated(o);
            for row in 0..rotated.height() {
                for col in 0..rotated.width() {
                    assert_eq!(rotated.bit(row, col), mask.bit_oriented(row, col, o));
                }
            }
        }
    }

    #[test]
    fn four_quarter_turns_is_identity() {
        let mask = BitMask::from_rows(&["##.", "#..", "##."]).unwrap();
        let turned = (0..4).fold(mask.clone(), |m, _| m.rotated(Orientation::R90));
        assert_eq!(turned, mask);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(BitMask::from_rows(&["##", "#"]).is_err());
        assert!(BitMask::from_rows::<&str>(&[]).is_err());
    }
}
