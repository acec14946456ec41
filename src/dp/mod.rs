//! Exact unbounded-knapsack optimization.
//!
//! - [`KnapsackSolver`]: UKP5 dynamic program over the whole catalog
//! - [`DpWorker`]: runs the solver on a dedicated thread, fed with catalog
//!   snapshots and polled for results
//! - [`DpConfig`]: table sizing bounds and worker polling interval
//!
//! The solver is deterministic and recomputes from scratch on every call;
//! the catalog only grows, so no incremental state is kept.

mod config;
mod solver;
mod worker;

pub use config::{DpConfig, KnapsackBounds};
pub use solver::KnapsackSolver;
pub use worker::{DpOutcome, DpWorker};
