use std::fmt::{Display, Formatter};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::geometry::primitives::Point;

/// Counter-clockwise rotation of a piece, restricted to multiples of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Orientation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::R0,
        Orientation::R90,
        Orientation::R180,
        Orientation::R270,
    ];

    pub fn degrees(&self) -> u16 {
        match self {
            Orientation::R0 => 0,
            Orientation::R90 => 90,
            Orientation::R180 => 180,
            Orientation::R270 => 270,
        }
    }

    pub fn from_degrees(degrees: u16) -> Result<Self> {
        match degrees {
            0 => Ok(Orientation::R0),
            90 => Ok(Orientation::R90),
            180 => Ok(Orientation::R180),
            270 => Ok(Orientation::R270),
            _ => bail!("unsupported orientation: {degrees} degrees, expected 0, 90, 180 or 270"),
        }
    }

    /// Whether width and height are exchanged by this rotation
    pub fn swaps_axes(&self) -> bool {
        matches!(self, Orientation::R90 | Orientation::R270)
    }

    /// (width, height) of a `width × height` raster after rotation
    pub fn rotated_dims(&self, width: usize, height: usize) -> (usize, usize) {
        match self.swaps_axes() {
            true => (height, width),
            false => (width, height),
        }
    }

    /// Maps a pixel `(row, col)` of the rotated raster back onto the un-rotated raster
    /// with natural dimensions `width × height`.
    #[inline(always)]
    pub fn to_original(&self, row: usize, col: usize, width: usize, height: usize) -> (usize, usize) {
        match self {
            Orientation::R0 => (row, col),
            Orientation::R90 => (col, width - 1 - row),
            Orientation::R180 => (height - 1 - row, width - 1 - col),
            Orientation::R270 => (height - 1 - col, row),
        }
    }

    /// Maps a pixel `(row, col)` of the un-rotated raster onto the rotated one.
    /// Inverse of [`Orientation::to_original`].
    pub fn rotate_point(&self, p: Point, width: usize, height: usize) -> Point {
        let (w, h) = (width as i64, height as i64);
        match self {
            Orientation::R0 => p,
            Orientation::R90 => Point::new(w - 1 - p.col, p.row),
            Orientation::R180 => Point::new(h - 1 - p.row, w - 1 - p.col),
            Orientation::R270 => Point::new(p.col, h - 1 - p.row),
        }
    }
}

impl TryFrom<u16> for Orientation {
    type Error = anyhow::Error;

    fn try_from(degrees: u16) -> Result<Self> {
        Orientation::from_degrees(degrees)
    }
}

impl From<Orientation> for u16 {
    fn from(o: Orientation) -> Self {
        o.degrees()
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Orientation::R0; "0")]
    #[test_case(Orientation::R90; "90")]
    #[test_case(Orientation::R180; "180")]
    #[test_case(Orientation::R270; "270")]
    fn rotate_point_inverts_to_original(o: Orientation) {
        let (w, h) = (5, 3);
        let (rw, rh) = o.rotated_dims(w, h);
        for row in 0..h {
            for col in 0..w {
                let rotated = o.rotate_point(Point::new(row as i64, col as i64), w, h);
                assert!(rotated.row >= 0 && (rotated.row as usize) < rh);
                assert!(rotated.col >= 0 && (rotated.col as usize) < rw);
                let back = o.to_original(rotated.row as usize, rotated.col as usize, w, h);
                assert_eq!(back, (row, col));
            }
        }
    }

    #[test]
    fn invalid_degrees() {
        assert!(Orientation::from_degrees(45).is_err());
        assert_eq!(Orientation::from_degrees(180).unwrap(), Orientation::R180);
    }
}
