mod orientation;
mod raster;

/// Primitive geometric types
pub mod primitives;

#[doc(inline)]
pub use orientation::Orientation;

#[doc(inline)]
pub use raster::BitMask;

#[doc(inline)]
pub use raster::Raster;
