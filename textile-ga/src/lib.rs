//! # textile-ga
//!
//! Nesting of raster pattern pieces onto a rectangular fabric sheet with a steady-state genetic algorithm.
//!
//! The crate is split into:
//! * [`geometry`]: points, rectangles, orientations and the [`Raster`](geometry::Raster) contract for piece masks
//! * [`entities`]: the fabric, pattern pieces, genes and their overlap cache
//! * [`eval`]: pixel-exact overlap and the weighted fitness model
//! * [`ga`]: a problem-agnostic elite/diverse genetic algorithm
//! * [`textile`]: the nesting specific operators (crossover, mutation, distance, placement) and [`TextileGA`](textile::TextileGA)
//! * [`io`]: external (serializable) representation of instances and solutions

/// Everything related to the rasterized geometry of pattern pieces
pub mod geometry;

/// Fabric, pattern pieces, genes and their caches
pub mod entities;

/// Overlap computation and fitness evaluation
pub mod eval;

/// Generic genetic algorithm engine
pub mod ga;

/// Nesting specific operators and the [`TextileGA`](textile::TextileGA) driver
pub mod textile;

/// Importing and exporting instances and solutions
pub mod io;

/// Helper functions which do not belong to any specific module
pub mod util;
