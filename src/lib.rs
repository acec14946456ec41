//! Online cart optimization for shopping agents.
//!
//! Agents discover discounted items as they move around and must decide what
//! to carry in a cart of fixed capacity. This crate provides:
//!
//! - **Catalog**: append-only record of discovered items, shared with
//!   background solvers through immutable snapshots.
//! - **Knapsack DP**: exact unbounded-knapsack solver (UKP5-style sweep)
//!   recomputed on a dedicated worker thread as the catalog grows.
//! - **Genetic Solver**: incremental GA stepped on the control loop,
//!   emitting a plan change whenever it finds a strictly better cart.
//! - **Differ**: turns a plan change into discard-then-fetch operations.
//! - **Executor**: per-agent FIFO of operations driven by an explicit
//!   Idle / Executing / Returning state machine that restores the agent's
//!   prior position, heading and destination once the queue drains.
//! - **Capacity Authority**: the only writer of cart state; validates
//!   capacity and pickup distance for every commit.
//!
//! # Architecture
//!
//! Movement, perception and rendering are external. The crate talks to
//! them only through the [`executor::Navigator`] trait and the items handed
//! to [`shopper::Shopper::tick`].
//!
//! # Features
//!
//! - `parallel`: breed GA offspring on the rayon thread pool. Seeded runs
//!   produce the same populations with or without it.

pub mod authority;
pub mod catalog;
pub mod config;
pub mod diff;
pub mod dp;
pub mod error;
pub mod executor;
pub mod ga;
pub mod report;
pub mod shopper;
pub mod solution;
pub mod strategy;

pub use error::{Result, ShopError};
