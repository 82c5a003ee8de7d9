use std::fmt::{Display, Formatter};
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Pixel position, expressed as (row, column).
/// Rows grow downwards, columns grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub row: i64,
    pub col: i64,
}

impl Point {
    pub const fn new(row: i64, col: i64) -> Self {
        Point { row, col }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.row - other.row) as f64).hypot((self.col - other.col) as f64)
    }

    pub fn translate(self, d_row: i64, d_col: i64) -> Self {
        Point {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl From<(i64, i64)> for Point {
    fn from((row, col): (i64, i64)) -> Self {
        Point { row, col }
    }
}

impl From<Point> for (i64, i64) {
    fn from(p: Point) -> Self {
        (p.row, p.col)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(r: {}, c: {})", self.row, self.col)
    }
}
