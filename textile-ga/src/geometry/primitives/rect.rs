use anyhow::Result;
use anyhow::ensure;
use serde::{Deserialize, Serialize};

use crate::geometry::primitives::Point;

/// Axis-aligned rectangle in pixel coordinates.
/// The minimum bounds are inclusive, the maximum bounds exclusive: `[row_min, row_max) × [col_min, col_max)`.
#[derive(Clone, Debug, PartialEq, Eq, Copy, Serialize, Deserialize)]
pub struct Rect {
    pub row_min: i64,
    pub col_min: i64,
    pub row_max: i64,
    pub col_max: i64,
}

impl Rect {
    pub fn try_new(row_min: i64, col_min: i64, row_max: i64, col_max: i64) -> Result<Self> {
        ensure!(
            row_min < row_max && col_min < col_max,
            "invalid rectangle, row_min: {row_min}, row_max: {row_max}, col_min: {col_min}, col_max: {col_max}"
        );
        Ok(Rect {
            row_min,
            col_min,
            row_max,
            col_max,
        })
    }

    /// Rectangle with its top-left corner at `top_left`, spanning `width` columns and `height` rows.
    pub fn from_top_left(top_left: Point, width: usize, height: usize) -> Self {
        Rect {
            row_min: top_left.row,
            col_min: top_left.col,
            row_max: top_left.row + height as i64,
            col_max: top_left.col + width as i64,
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.row_min, self.col_min)
    }

    pub fn width(&self) -> i64 {
        self.col_max - self.col_min
    }

    pub fn height(&self) -> i64 {
        self.row_max - self.row_min
    }

    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// Returns true if both rectangles share at least one pixel.
    /// Rectangles which only touch along an edge do not collide.
    #[inline(always)]
    pub fn collides_with(&self, other: &Rect) -> bool {
        self.col_min < other.col_max
            && other.col_min < self.col_max
            && self.row_min < other.row_max
            && other.row_min < self.row_max
    }

    /// Returns the rectangle shared by `self` and `other`, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.collides_with(other) {
            return None;
        }
        Some(Rect {
            row_min: i64::max(self.row_min, other.row_min),
            col_min: i64::max(self.col_min, other.col_min),
            row_max: i64::min(self.row_max, other.row_max),
            col_max: i64::min(self.col_max, other.col_max),
        })
    }

    /// Returns true if `other` lies entirely within `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        self.row_min <= other.row_min
            && self.col_min <= other.col_min
            && self.row_max >= other.row_max
            && self.col_max >= other.col_max
    }

    /// Smallest rectangle enclosing all rectangles in the iterator, `None` if it is empty.
    pub fn bounding<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        rects.into_iter().fold(None, |acc, r| match acc {
            None => Some(*r),
            Some(acc) => Some(Rect {
                row_min: i64::min(acc.row_min, r.row_min),
                col_min: i64::min(acc.col_min, r.col_min),
                row_max: i64::max(acc.row_max, r.row_max),
                col_max: i64::max(acc.col_max, r.col_max),
            }),
        })
    }
}
