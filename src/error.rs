//! Error types for graph construction and solver configuration.
//!
//! Degenerate instances (too few nodes, unreachable cities) are not errors:
//! solvers report them through [`PathResult::failure`](crate::models::PathResult::failure).

use thiserror::Error;

/// Errors raised while building a [`WeightedGraph`](crate::models::WeightedGraph).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// An edge endpoint is not a node id in `1..=node_count`.
    #[error("node {node} is out of range 1..={node_count}")]
    NodeOutOfRange {
        /// Offending node id.
        node: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// An edge weight is NaN or negative.
    #[error("edge {from}-{to} has invalid weight {weight}")]
    InvalidWeight {
        /// Edge source.
        from: usize,
        /// Edge target.
        to: usize,
        /// Rejected weight.
        weight: f64,
    },

    /// A weight matrix is not square.
    #[error("weight matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Row index (0-based).
        row: usize,
        /// Actual row length.
        len: usize,
        /// Expected row length.
        expected: usize,
    },
}

/// Errors raised by [`ColonyConfig::validate`](crate::colony::ColonyConfig::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric parameter is outside its admissible range.
    #[error("{name} = {value} is out of range, expected {expected}")]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Human-readable admissible range.
        expected: &'static str,
    },

    /// The colony was configured with zero ants.
    #[error("num_ants must be at least 1")]
    NoAnts,
}
