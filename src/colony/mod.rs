//! Ant System colony for closed tours.
//!
//! - [`ColonyEngine`] — generation loop with batch ([`ColonyEngine::solve`])
//!   and stepwise ([`ColonyEngine::advance`]) execution
//! - [`Ant`] — probabilistic tour construction
//! - [`PheromoneMatrix`] — trail evaporation and deposit
//! - [`SharedColony`] — lock-guarded handle for observer threads
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System"
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*, MIT Press

mod ant;
mod config;
mod engine;
mod pheromone;
mod shared;

pub use ant::Ant;
pub use config::{ColonyConfig, DEFAULT_STAGNATION_LIMIT};
pub use engine::ColonyEngine;
pub use pheromone::PheromoneMatrix;
pub use shared::{AntView, ColonySnapshot, SharedColony};
