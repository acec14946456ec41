//! Genetic solver for the cart problem.
//!
//! An incremental, tick-driven GA over integer count vectors. The population
//! is seeded once the catalog is large enough and then advances one
//! generation per thinking tick; new catalog items join every individual
//! with a count of zero.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population, selection, throttle)
//! - [`GeneticSolver`]: Owns the population and runs generations
//! - [`GaStep`]: Outcome of one tick, including improvement operations
//!
//! # Submodules
//!
//! - [`operators`]: Seeding, uniform crossover and step mutation
//! - [`selection`]: Tournament selection
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
pub mod selection;
mod solver;
mod types;

pub use config::GaConfig;
pub use solver::{GaStep, GeneticSolver};
pub use types::{GenerationStats, Individual};
