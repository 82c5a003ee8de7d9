mod config;
mod textile_ga;

/// Recombination of two genes
pub mod crossover;

/// Gene distance and feature vectors
pub mod distance;

/// Translation based mutation operators and local search
pub mod mutation;

/// Random placement, clamping and other operations on sets of pieces
pub mod placement;

#[doc(inline)]
pub use config::CrossoverConfig;

#[doc(inline)]
pub use config::CrossoverStrategy;

#[doc(inline)]
pub use config::DistanceConfig;

#[doc(inline)]
pub use config::MutationConfig;

#[doc(inline)]
pub use config::MutationStrategy;

#[doc(inline)]
pub use config::TextileGAConfig;

#[doc(inline)]
pub use textile_ga::RunTime;

#[doc(inline)]
pub use textile_ga::TextileGA;

#[doc(inline)]
pub use textile_ga::TextileGAStats;

#[doc(inline)]
pub use textile_ga::TextileProblem;
