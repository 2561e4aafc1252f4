//! Thread-safe handle for observing a stepwise colony run.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::ant::Ant;
use super::engine::ColonyEngine;
use crate::models::Tour;

/// Owned copy of one ant's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntView {
    /// Cities visited so far.
    pub tour: Vec<usize>,
    /// City the ant stands on.
    pub current_city: Option<usize>,
    /// Whether the tour is closed.
    pub finished: bool,
}

impl From<&Ant> for AntView {
    fn from(ant: &Ant) -> Self {
        Self {
            tour: ant.tour().to_vec(),
            current_city: ant.current_city(),
            finished: ant.is_finished(),
        }
    }
}

/// Owned copy of the observable colony state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    /// Current generation.
    pub ants: Vec<AntView>,
    /// Best tour found so far.
    pub best: Option<Tour>,
    /// Generation counter.
    pub iteration: usize,
    /// Consecutive non-improving generations.
    pub stagnation_count: usize,
    /// Whether the run is over.
    pub finished: bool,
}

impl ColonySnapshot {
    /// Copies the observable state out of an engine.
    pub fn capture(engine: &ColonyEngine) -> Self {
        Self {
            ants: engine.current_ants().iter().map(AntView::from).collect(),
            best: engine.best_so_far().cloned(),
            iteration: engine.iteration(),
            stagnation_count: engine.stagnation_count(),
            finished: engine.is_finished(),
        }
    }
}

/// A colony shared between one driver and any number of observers.
///
/// The driver calls [`advance`](Self::advance) on its own cadence; observers
/// call [`snapshot`](Self::snapshot) and receive owned copies, so no
/// reference into the live engine ever crosses threads. Every call holds
/// the lock only for the duration of one step or one copy.
///
/// # Examples
///
/// ```
/// use u_tour::colony::{ColonyConfig, ColonyEngine, SharedColony};
/// use u_tour::models::WeightedGraph;
///
/// let g = WeightedGraph::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
/// let engine = ColonyEngine::new(&g, ColonyConfig::default().with_seed(3)).unwrap();
/// let shared = SharedColony::new(engine);
///
/// let driver = shared.clone();
/// let handle = std::thread::spawn(move || while driver.advance() {});
/// let _view = shared.snapshot();
/// handle.join().unwrap();
///
/// assert!(shared.snapshot().finished);
/// ```
#[derive(Debug, Clone)]
pub struct SharedColony {
    inner: Arc<Mutex<ColonyEngine>>,
}

impl SharedColony {
    /// Wraps an engine.
    pub fn new(engine: ColonyEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Performs one [`ColonyEngine::advance`] step under the lock.
    pub fn advance(&self) -> bool {
        self.inner.lock().advance()
    }

    /// Copies the current observable state.
    pub fn snapshot(&self) -> ColonySnapshot {
        ColonySnapshot::capture(&self.inner.lock())
    }

    /// Copies the best tour found so far.
    pub fn best_so_far(&self) -> Option<Tour> {
        self.inner.lock().best_so_far().cloned()
    }

    /// Runs `f` against the engine while holding the lock.
    pub fn with_engine<T>(&self, f: impl FnOnce(&ColonyEngine) -> T) -> T {
        f(&self.inner.lock())
    }

    /// Recovers the engine if this is the last handle.
    pub fn try_into_inner(self) -> Result<ColonyEngine, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::ColonyConfig;
    use crate::models::WeightedGraph;
    use std::thread;

    fn engine(seed: u64) -> ColonyEngine {
        let g = WeightedGraph::from_points(&[
            (0.0, 0.0),
            (4.0, 1.0),
            (5.0, 5.0),
            (1.0, 4.0),
            (2.0, 2.0),
        ]);
        let config = ColonyConfig::default().with_iterations(30).with_seed(seed);
        ColonyEngine::new(&g, config).expect("valid")
    }

    #[test]
    fn test_snapshot_initial_state() {
        let shared = SharedColony::new(engine(1));
        let snap = shared.snapshot();
        assert_eq!(snap.ants.len(), 5);
        assert!(snap.ants.iter().all(|a| a.tour.len() == 1 && !a.finished));
        assert!(snap.best.is_none());
        assert_eq!(snap.iteration, 0);
        assert!(!snap.finished);
    }

    #[test]
    fn test_concurrent_observer() {
        let shared = SharedColony::new(engine(2));
        let driver = shared.clone();
        let handle = thread::spawn(move || {
            let mut steps = 0usize;
            while driver.advance() {
                steps += 1;
            }
            steps
        });

        let mut last_best = f64::INFINITY;
        for _ in 0..200 {
            let snap = shared.snapshot();
            for ant in &snap.ants {
                assert!(ant.tour.len() <= 6);
            }
            if let Some(best) = snap.best {
                assert!(best.length() <= last_best);
                last_best = best.length();
            }
        }

        let steps = handle.join().expect("driver thread");
        assert!(steps > 0);
        assert!(shared.snapshot().finished);
    }

    #[test]
    fn test_shared_matches_direct_engine() {
        let shared = SharedColony::new(engine(9));
        while shared.advance() {}
        let mut direct = engine(9);
        while direct.advance() {}
        assert_eq!(shared.best_so_far().as_ref(), direct.best_so_far());
    }

    #[test]
    fn test_try_into_inner() {
        let shared = SharedColony::new(engine(4));
        let other = shared.clone();
        let shared = shared.try_into_inner().expect_err("two handles alive");
        drop(other);
        let engine = shared.try_into_inner().expect("last handle");
        assert_eq!(engine.iteration(), 0);
    }

    #[test]
    fn test_with_engine() {
        let shared = SharedColony::new(engine(5));
        let cities = shared.with_engine(|e| e.num_cities());
        assert_eq!(cities, 5);
    }
}
