mod config;
mod engine;
mod population;
mod problem;

/// Bulk selection of a diverse subset of individuals
pub mod diversity;

/// Lloyd's k-means with k-means++ seeding
pub mod kmeans;

/// Score based parent selection
pub mod selection;

#[doc(inline)]
pub use config::DiversityStrategy;

#[doc(inline)]
pub use config::GAConfig;

#[doc(inline)]
pub use config::GenerationStrategy;

#[doc(inline)]
pub use config::ScoreType;

#[doc(inline)]
pub use engine::GeneticAlgorithm;

#[doc(inline)]
pub use population::Insertion;

#[doc(inline)]
pub use population::Population;

#[doc(inline)]
pub use problem::GAProblem;

#[doc(inline)]
pub use problem::ScoredIndividual;
