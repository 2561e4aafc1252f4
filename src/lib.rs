//! # u-tour
//!
//! Closed-tour (TSP-style) optimization over weighted graphs with two
//! constructive heuristics: a stochastic Ant System colony and the
//! deterministic farthest insertion baseline.
//!
//! ## Modules
//!
//! - [`models`] — Input graph, frozen tour value, solver result envelope
//! - [`distance`] — Dense symmetric distance matrix
//! - [`colony`] — Ant System engine with batch and stepwise execution
//! - [`constructive`] — Farthest insertion
//! - [`metrics`] — Elapsed time and counters attached to every run
//! - [`compare`] — Repeated-run comparison of both solvers
//! - [`error`] — Graph and configuration errors

pub mod colony;
pub mod compare;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod metrics;
pub mod models;
