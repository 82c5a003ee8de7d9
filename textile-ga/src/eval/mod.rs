/// Pixel-exact overlap between two placed pieces
pub mod overlap;

/// Weighted fitness of an arrangement
pub mod fitness;

#[doc(inline)]
pub use fitness::AverageOrigin;

#[doc(inline)]
pub use fitness::FitnessData;

#[doc(inline)]
pub use fitness::FitnessWeights;

#[doc(inline)]
pub use overlap::overlap;
