//! Domain model types for closed-tour problems.
//!
//! Provides the weighted input graph, the frozen tour value produced by the
//! solvers, and the result envelope shared by every solver.

mod graph;
mod result;
mod tour;

pub use graph::{Edge, WeightedGraph};
pub use result::PathResult;
pub use tour::Tour;
