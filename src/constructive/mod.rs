//! Constructive heuristics for closed tours.
//!
//! - [`farthest_insertion`] — Farthest insertion (Rosenkrantz et al., 1977), O(n³)

mod farthest_insertion;

pub use farthest_insertion::farthest_insertion;
