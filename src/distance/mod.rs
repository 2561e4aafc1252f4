//! Distance tables.
//!
//! Provides a dense, symmetric distance matrix derived once from a
//! [`WeightedGraph`](crate::models::WeightedGraph).

mod matrix;

pub use matrix::DistanceMatrix;
