use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::geometry::primitives::Rect;

/// Rectangular fabric sheet onto which the pieces are nested.
/// Columns run along the length of the roll, rows across its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fabric {
    pub width: usize,
    pub height: usize,
}

impl Fabric {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "fabric dimensions must be positive, got {width}×{height}"
        );
        Ok(Fabric { width, height })
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn max_dim(&self) -> usize {
        usize::max(self.width, self.height)
    }

    pub fn rect(&self) -> Rect {
        Rect {
            row_min: 0,
            col_min: 0,
            row_max: self.height as i64,
            col_max: self.width as i64,
        }
    }
}
