mod fabric;
mod gene;
mod overlap_matrix;
mod pattern_piece;

#[doc(inline)]
pub use fabric::Fabric;

#[doc(inline)]
pub use gene::Gene;

#[doc(inline)]
pub use overlap_matrix::OverlapMatrix;

#[doc(inline)]
pub use pattern_piece::PatternPiece;

#[doc(inline)]
pub use pattern_piece::PieceMeta;

#[doc(inline)]
pub use pattern_piece::PieceShape;

#[doc(inline)]
pub use pattern_piece::PieceSource;

#[doc(inline)]
pub use pattern_piece::DEFAULT_RESOLUTION;
