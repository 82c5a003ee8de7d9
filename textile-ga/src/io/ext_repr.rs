use serde::{Deserialize, Serialize};

use crate::eval::FitnessData;

/// External representation of a nesting instance: a fabric and the pieces to cut from it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtInstance {
    /// Name of the instance
    #[serde(default)]
    pub name: String,
    pub fabric: ExtFabric,
    pub pieces: Vec<ExtPiece>,
}

/// External representation of a [`Fabric`](crate::entities::Fabric), in pixels
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct ExtFabric {
    pub width: usize,
    pub height: usize,
}

/// External representation of a [`PieceShape`](crate::entities::PieceShape).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtPiece {
    /// Unique identifier of the piece, ids are consecutive starting from 0
    pub id: usize,
    /// Number of times the piece has to be cut
    #[serde(default = "default_qty")]
    pub qty: usize,
    pub shape: ExtShape,
    /// Rotation center `(row, col)` relative to the top-left corner of the mask.
    /// Middle of the mask if not specified
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub center: Option<(i64, i64)>,
    /// Pixels per cm
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resolution: Option<f64>,
    #[serde(default)]
    pub n_holes: usize,
}

fn default_qty() -> usize {
    1
}

/// Various ways to represent the mask of a piece
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ExtShape {
    /// Solid axis-aligned rectangle
    Rectangle { width: usize, height: usize },
    /// One string per row of the mask, `#` or `1` for a set pixel, anything else for an empty one
    Rows(Vec<String>),
}

/// External representation of a placed [`PatternPiece`](crate::entities::PatternPiece)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ExtPlacedPiece {
    /// Position of the piece within the gene
    pub slot: usize,
    /// Id of the shape of the piece
    pub piece_id: usize,
    /// `(row, col)` of the rotation center on the fabric
    pub center: (i64, i64),
    /// Counter-clockwise rotation in degrees
    pub orientation: u16,
}

/// External representation of a [`Gene`](crate::entities::Gene) together with its evaluation
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSolution {
    pub fabric: ExtFabric,
    pub placements: Vec<ExtPlacedPiece>,
    pub fitness: FitnessData,
}
