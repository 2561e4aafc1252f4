//! Ant System execution engine.
//!
//! # Algorithm
//!
//! 1. Place one ant per city (by default) on a random start city
//! 2. Let every ant build a closed tour, choosing each next city by
//!    roulette-wheel selection over `tau^alpha * (1/d)^beta`
//! 3. Keep a frozen copy of the best tour seen so far (strict improvement)
//! 4. Stop if the best tour has not improved for `stagnation_limit`
//!    consecutive generations
//! 5. Evaporate all trails by `1 - rho`, then let every ant deposit
//!    `q / length` on the edges it used
//! 6. Repeat with a fresh generation until the iteration budget is spent
//!
//! Both [`ColonyEngine::solve`] and [`ColonyEngine::advance`] drive the same
//! per-generation routine; they only differ in how far ants move per call.
//!
//! # Reference
//!
//! Dorigo, M., Maniezzo, V. & Colorni, A. (1996). "Ant System: Optimization
//! by a Colony of Cooperating Agents", *IEEE Trans. SMC-B* 26(1), 29-41.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::ant::Ant;
use super::config::ColonyConfig;
use super::pheromone::PheromoneMatrix;
use crate::distance::DistanceMatrix;
use crate::error::ConfigError;
use crate::metrics::RunMetrics;
use crate::models::{PathResult, Tour, WeightedGraph};

/// How far ants move during one call of the generation routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Construction {
    /// Every unfinished ant appends one city.
    OneStep,
    /// Every ant runs to a closed tour.
    ToCompletion,
}

/// Counts consecutive generations without strict improvement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StagnationTracker {
    count: usize,
    limit: usize,
}

impl StagnationTracker {
    pub(crate) fn new(limit: usize) -> Self {
        Self { count: 0, limit }
    }

    /// Records one generation. Returns `true` once the limit is reached.
    pub(crate) fn record(&mut self, improved: bool) -> bool {
        if improved {
            self.count = 0;
        } else {
            self.count += 1;
        }
        self.limit > 0 && self.count >= self.limit
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

/// Ant System colony over a fixed graph.
///
/// Owns the distance and pheromone matrices, the current generation of ants,
/// the best tour found, and the iteration/stagnation counters.
///
/// # Examples
///
/// Batch mode:
///
/// ```
/// use u_tour::colony::{ColonyConfig, ColonyEngine};
/// use u_tour::models::WeightedGraph;
///
/// let g = WeightedGraph::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let mut engine = ColonyEngine::new(&g, ColonyConfig::default().with_seed(42)).unwrap();
/// let result = engine.solve();
/// assert!((result.cost - 4.0).abs() < 1e-9);
/// ```
///
/// Stepwise mode, for an observer that redraws between ticks:
///
/// ```
/// use u_tour::colony::{ColonyConfig, ColonyEngine};
/// use u_tour::models::WeightedGraph;
///
/// let g = WeightedGraph::from_points(&[(0.0, 0.0), (2.0, 0.0), (1.0, 2.0)]);
/// let mut engine = ColonyEngine::new(&g, ColonyConfig::default().with_seed(1)).unwrap();
/// while engine.advance() {
///     let _moving: usize = engine.current_ants().iter().filter(|a| !a.is_finished()).count();
/// }
/// assert!(engine.best_so_far().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ColonyEngine {
    config: ColonyConfig,
    distances: DistanceMatrix,
    pheromone: PheromoneMatrix,
    ants: Vec<Ant>,
    best: Option<Tour>,
    iteration: usize,
    stagnation: StagnationTracker,
    stagnated: bool,
    touched: bool,
    reported: bool,
    rng: StdRng,
    metrics: RunMetrics,
}

impl ColonyEngine {
    /// Creates an engine, seeding its random source from `config.seed`
    /// (or from OS entropy when unset).
    pub fn new(graph: &WeightedGraph, config: ColonyConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(graph, config, rng)
    }

    /// Creates an engine drawing every random decision from `rng`.
    pub fn with_rng(
        graph: &WeightedGraph,
        config: ColonyConfig,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let distances = DistanceMatrix::from_graph(graph);
        let pheromone = PheromoneMatrix::new(graph.node_count(), config.tau0);
        let mut engine = Self {
            stagnation: StagnationTracker::new(config.stagnation_limit),
            config,
            distances,
            pheromone,
            ants: Vec::new(),
            best: None,
            iteration: 0,
            stagnated: false,
            touched: false,
            reported: false,
            rng,
            metrics: RunMetrics::new(),
        };
        engine.spawn_generation();
        Ok(engine)
    }

    /// Runs the whole colony and returns the best closed tour.
    ///
    /// Restarts from fresh pheromone trails if the engine was already driven.
    /// Returns a failure result for graphs with fewer than two cities, and
    /// when the best tour found uses a missing edge.
    pub fn solve(&mut self) -> PathResult {
        if self.touched {
            self.reset();
        }
        if !self.is_applicable() {
            info!(
                cities = self.num_cities(),
                "fewer than two cities, no tour to build"
            );
            return PathResult::failure_with(self.metrics.clone());
        }
        while self.run_generation(Construction::ToCompletion) {}
        self.result()
    }

    /// Moves every unfinished ant of the current generation by one city.
    ///
    /// When the generation completes, updates the best tour, the stagnation
    /// counter and the pheromone trails, then starts a new generation, also
    /// after the last generation of the budget. Returns `false` once the run
    /// is over (budget spent, stagnation, or fewer than two cities).
    pub fn advance(&mut self) -> bool {
        self.run_generation(Construction::OneStep)
    }

    /// Best tour found so far.
    pub fn best_so_far(&self) -> Option<&Tour> {
        self.best.as_ref()
    }

    /// The current generation of ants.
    pub fn current_ants(&self) -> &[Ant] {
        &self.ants
    }

    /// Wraps the best tour in a [`PathResult`].
    ///
    /// Infeasible (infinite-length) tours are reported as failures; the raw
    /// tour remains available through [`best_so_far`](Self::best_so_far).
    pub fn result(&self) -> PathResult {
        match &self.best {
            Some(tour) if tour.is_feasible() => {
                PathResult::new(tour.cities().to_vec(), tour.length(), self.metrics.clone())
            }
            Some(tour) => {
                warn!(
                    cities = ?tour.cities(),
                    "best tour uses a missing edge, graph has no feasible cycle"
                );
                PathResult::failure_with(self.metrics.clone())
            }
            None => PathResult::failure_with(self.metrics.clone()),
        }
    }

    /// Completed generations. Jumps to the budget when the run stagnates.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Consecutive generations without strict improvement.
    pub fn stagnation_count(&self) -> usize {
        self.stagnation.count()
    }

    /// Returns `true` if the run stopped on the stagnation limit.
    pub fn stagnated(&self) -> bool {
        self.stagnated
    }

    /// Returns `true` once no further generation will run.
    pub fn is_finished(&self) -> bool {
        !self.is_applicable() || self.iteration >= self.config.iterations
    }

    /// Number of cities.
    pub fn num_cities(&self) -> usize {
        self.distances.size()
    }

    /// Configuration in use.
    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// Distance matrix derived from the graph.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Current pheromone trails.
    pub fn pheromone(&self) -> &PheromoneMatrix {
        &self.pheromone
    }

    /// Timing and counters: generations as iterations, ant moves as operations.
    ///
    /// Elapsed time covers only the time spent inside [`solve`](Self::solve)
    /// and [`advance`](Self::advance), not the gaps between stepwise calls.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    fn is_applicable(&self) -> bool {
        self.num_cities() >= 2
    }

    fn reset(&mut self) {
        self.pheromone = PheromoneMatrix::new(self.num_cities(), self.config.tau0);
        self.best = None;
        self.iteration = 0;
        self.stagnation = StagnationTracker::new(self.config.stagnation_limit);
        self.stagnated = false;
        self.touched = false;
        self.reported = false;
        self.metrics.reset();
        self.spawn_generation();
    }

    /// Replaces the ants with a fresh generation. Each ant gets its own
    /// random stream split off the engine's source.
    fn spawn_generation(&mut self) {
        let n = self.num_cities();
        let count = self.config.ants_for(n);
        let rng = &mut self.rng;
        self.ants = (0..count)
            .map(|_| {
                let mut ant = Ant::new(n, StdRng::from_rng(&mut *rng));
                ant.start_randomly();
                ant
            })
            .collect();
    }

    /// Shared body of `solve` and `advance`. Returns `true` while the run
    /// continues.
    fn run_generation(&mut self, mode: Construction) -> bool {
        if self.is_finished() {
            self.finish_run();
            return false;
        }
        self.touched = true;
        self.metrics.start();

        let (alpha, beta) = (self.config.alpha, self.config.beta);
        let mut moves = 0u64;
        for ant in self.ants.iter_mut().filter(|a| !a.is_finished()) {
            let before = ant.tour().len();
            match mode {
                Construction::OneStep => {
                    ant.advance_one_step(&self.pheromone, &self.distances, alpha, beta);
                }
                Construction::ToCompletion => {
                    ant.construct_tour(&self.pheromone, &self.distances, alpha, beta);
                }
            }
            moves += (ant.tour().len() - before) as u64;
        }
        self.metrics.add_operations(moves);

        let running = !self.ants.iter().all(Ant::is_finished) || self.close_generation();
        self.metrics.stop();
        if !running {
            self.finish_run();
        }
        running
    }

    /// Scores a finished generation and prepares the next one.
    fn close_generation(&mut self) -> bool {
        let mut generation_best = f64::INFINITY;
        for ant in &mut self.ants {
            if let Some(length) = ant.compute_length(&self.distances) {
                generation_best = generation_best.min(length);
            }
        }

        let previous = self.best.as_ref().map(Tour::length);
        self.update_best();
        let improved = match (previous, &self.best) {
            (None, Some(_)) => true,
            (Some(prev), Some(best)) => best.length() < prev,
            _ => false,
        };
        let limit_reached = self.stagnation.record(improved);
        self.metrics.add_iterations(1);

        debug!(
            iteration = self.iteration + 1,
            generation_best,
            best = self.best.as_ref().map_or(f64::INFINITY, Tour::length),
            stagnation = self.stagnation.count(),
            "generation complete"
        );

        if limit_reached {
            self.stagnated = true;
            self.iteration = self.config.iterations;
            return false;
        }

        self.pheromone
            .update(&self.ants, self.config.rho, self.config.q);
        self.iteration += 1;
        self.spawn_generation();
        true
    }

    /// Freezes any ant strictly shorter than the current best.
    fn update_best(&mut self) {
        for ant in &self.ants {
            let Some(length) = ant.length() else {
                continue;
            };
            let better = self.best.as_ref().is_none_or(|best| length < best.length());
            if better {
                self.best = ant.snapshot();
            }
        }
    }

    fn finish_run(&mut self) {
        if self.reported || !self.touched {
            return;
        }
        self.reported = true;
        info!(
            generations = self.metrics.iterations(),
            best = self.best.as_ref().map_or(f64::INFINITY, Tour::length),
            stagnated = self.stagnated,
            elapsed_ms = self.metrics.elapsed_millis(),
            "ant colony finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> WeightedGraph {
        WeightedGraph::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    fn scattered() -> WeightedGraph {
        WeightedGraph::from_points(&[
            (0.0, 0.0),
            (7.0, 1.0),
            (3.0, 6.0),
            (9.0, 8.0),
            (1.0, 9.0),
            (5.0, 3.0),
            (8.0, 4.0),
            (2.0, 3.0),
        ])
    }

    fn assert_valid_tour(tour: &[usize], n: usize) {
        assert_eq!(tour.len(), n + 1);
        assert_eq!(tour[0], tour[n]);
        let mut open = tour[..n].to_vec();
        open.sort_unstable();
        assert_eq!(open, (1..=n).collect::<Vec<_>>());
    }

    #[test]
    fn test_stagnation_tracker_limit() {
        let mut t = StagnationTracker::new(3);
        assert!(!t.record(false));
        assert!(!t.record(false));
        assert!(t.record(false));
        assert_eq!(t.count(), 3);
    }

    #[test]
    fn test_stagnation_tracker_reset_before_limit() {
        let mut t = StagnationTracker::new(3);
        assert!(!t.record(false));
        assert!(!t.record(false));
        assert!(!t.record(true));
        assert_eq!(t.count(), 0);
        assert!(!t.record(false));
        assert!(!t.record(false));
        assert!(t.record(false));
    }

    #[test]
    fn test_stagnation_tracker_disabled() {
        let mut t = StagnationTracker::new(0);
        for _ in 0..1000 {
            assert!(!t.record(false));
        }
    }

    #[test]
    fn test_solve_square_optimal() {
        let mut engine =
            ColonyEngine::new(&square(), ColonyConfig::default().with_seed(42)).expect("valid");
        let result = engine.solve();
        assert!(result.is_success());
        assert!((result.cost - 4.0).abs() < 1e-9);
        assert_valid_tour(result.path.as_deref().expect("path"), 4);
    }

    #[test]
    fn test_solve_returns_valid_tour() {
        let config = ColonyConfig::default().with_iterations(30).with_seed(7);
        let mut engine = ColonyEngine::new(&scattered(), config).expect("valid");
        let result = engine.solve();
        let path = result.path.expect("path");
        assert_valid_tour(&path, 8);
        let dm = DistanceMatrix::from_graph(&scattered());
        assert!((dm.path_length(&path) - result.cost).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = ColonyEngine::new(&square(), ColonyConfig::default().with_rho(-0.1));
        assert!(err.is_err());
    }

    #[test]
    fn test_advance_matches_solve() {
        let config = ColonyConfig::default().with_iterations(25).with_seed(99);

        let mut batch = ColonyEngine::new(&scattered(), config.clone()).expect("valid");
        let batch_result = batch.solve();

        let mut stepped = ColonyEngine::new(&scattered(), config).expect("valid");
        while stepped.advance() {}
        let stepped_result = stepped.result();

        assert_eq!(batch_result.path, stepped_result.path);
        assert!((batch_result.cost - stepped_result.cost).abs() < 1e-12);
        assert_eq!(batch.metrics().iterations(), stepped.metrics().iterations());
        assert_eq!(batch.stagnated(), stepped.stagnated());
    }

    #[test]
    fn test_advance_moves_one_city_per_call() {
        let config = ColonyConfig::default().with_seed(3);
        let mut engine = ColonyEngine::new(&scattered(), config).expect("valid");
        assert!(engine.current_ants().iter().all(|a| a.tour().len() == 1));
        assert!(engine.advance());
        assert!(engine.current_ants().iter().all(|a| a.tour().len() == 2));
        assert_eq!(engine.current_ants().len(), 8);
        assert_eq!(engine.iteration(), 0);
    }

    #[test]
    fn test_generation_closes_after_n_steps() {
        let config = ColonyConfig::default().with_seed(3);
        let mut engine = ColonyEngine::new(&square(), config).expect("valid");
        // 3 steps to visit the other cities, 1 to close the cycle.
        for _ in 0..3 {
            assert!(engine.advance());
            assert!(engine.best_so_far().is_none());
        }
        assert!(engine.advance());
        assert_eq!(engine.iteration(), 1);
        assert!(engine.best_so_far().is_some());
        assert!(engine.current_ants().iter().all(|a| a.tour().len() == 1));
    }

    #[test]
    fn test_last_generation_respawns_ants() {
        let config = ColonyConfig::default().with_iterations(1).with_seed(6);
        let mut engine = ColonyEngine::new(&square(), config).expect("valid");
        for _ in 0..4 {
            assert!(engine.advance());
        }
        assert_eq!(engine.iteration(), 1);
        assert!(engine.is_finished());
        assert_eq!(engine.current_ants().len(), 4);
        assert!(engine
            .current_ants()
            .iter()
            .all(|a| a.tour().len() == 1 && !a.is_finished()));
        assert!(!engine.advance());
        assert!(engine.current_ants().iter().all(|a| a.tour().len() == 1));
    }

    #[test]
    fn test_stepwise_time_excludes_idle_gaps() {
        let config = ColonyConfig::default().with_seed(6);
        let mut engine = ColonyEngine::new(&square(), config).expect("valid");
        assert!(engine.advance());
        assert!(!engine.metrics().is_running());
        let after_first = engine.metrics().elapsed();
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(engine.metrics().elapsed(), after_first);
        assert!(engine.advance());
        assert!(engine.metrics().elapsed() < after_first + std::time::Duration::from_millis(20));
    }

    #[test]
    fn test_best_never_worsens() {
        let config = ColonyConfig::default().with_iterations(40).with_seed(5);
        let mut engine = ColonyEngine::new(&scattered(), config).expect("valid");
        let mut last = f64::INFINITY;
        while engine.advance() {
            if let Some(best) = engine.best_so_far() {
                assert!(best.length() <= last);
                last = best.length();
            }
        }
    }

    #[test]
    fn test_stagnation_stops_exactly_at_limit() {
        // Every tour of a triangle has the same length: the first generation
        // sets the best, every later one fails to improve it.
        let g = WeightedGraph::from_points(&[(0.0, 0.0), (3.0, 0.0), (0.0, 4.0)]);
        let config = ColonyConfig::default()
            .with_iterations(100)
            .with_stagnation_limit(5)
            .with_seed(1);
        let mut engine = ColonyEngine::new(&g, config).expect("valid");
        let result = engine.solve();
        assert!((result.cost - 12.0).abs() < 1e-9);
        assert!(engine.stagnated());
        assert_eq!(engine.stagnation_count(), 5);
        assert_eq!(engine.metrics().iterations(), 6);
        assert!(engine.is_finished());
    }

    #[test]
    fn test_stagnation_stepwise_forces_budget() {
        let g = WeightedGraph::from_points(&[(0.0, 0.0), (3.0, 0.0), (0.0, 4.0)]);
        let config = ColonyConfig::default()
            .with_iterations(100)
            .with_stagnation_limit(2)
            .with_seed(1);
        let mut engine = ColonyEngine::new(&g, config).expect("valid");
        let mut calls = 0;
        while engine.advance() {
            calls += 1;
        }
        // 3 generations of 3 calls each; the last call returns false.
        assert_eq!(calls, 8);
        assert!(engine.stagnated());
        assert_eq!(engine.iteration(), 100);
        assert!(!engine.advance());
    }

    #[test]
    fn test_iteration_budget_without_stagnation() {
        let config = ColonyConfig::default()
            .with_iterations(7)
            .with_stagnation_limit(0)
            .with_seed(2);
        let mut engine = ColonyEngine::new(&square(), config).expect("valid");
        engine.solve();
        assert_eq!(engine.iteration(), 7);
        assert_eq!(engine.metrics().iterations(), 7);
        assert!(!engine.stagnated());
    }

    #[test]
    fn test_zero_iterations() {
        let config = ColonyConfig::default().with_iterations(0).with_seed(2);
        let mut engine = ColonyEngine::new(&square(), config).expect("valid");
        assert!(!engine.advance());
        assert!(engine.solve().path.is_none());
    }

    #[test]
    fn test_degenerate_graph() {
        for n in [0, 1] {
            let mut engine =
                ColonyEngine::new(&WeightedGraph::new(n), ColonyConfig::default().with_seed(0))
                    .expect("valid");
            assert!(!engine.advance());
            let result = engine.solve();
            assert!(result.path.is_none());
            assert!(result.cost.is_infinite());
        }
    }

    #[test]
    fn test_infeasible_graph_surfaces_failure() {
        // Path graph 1-2-3: no Hamiltonian cycle exists.
        let g = WeightedGraph::from_edges(3, [(1, 2, 1.0), (2, 3, 1.0)]).expect("valid");
        let config = ColonyConfig::default().with_iterations(5).with_seed(4);
        let mut engine = ColonyEngine::new(&g, config).expect("valid");
        let result = engine.solve();
        assert!(!result.is_success());
        assert!(result.path.is_none());
        let best = engine.best_so_far().expect("ants still finished");
        assert!(!best.is_feasible());
    }

    #[test]
    fn test_second_solve_restarts() {
        let config = ColonyConfig::default().with_iterations(10).with_seed(8);
        let mut engine = ColonyEngine::new(&scattered(), config).expect("valid");
        engine.solve();
        assert_eq!(engine.iteration(), 10);
        let result = engine.solve();
        assert!(result.is_success());
        assert_eq!(engine.iteration(), 10);
        assert_eq!(engine.metrics().iterations(), 10);
    }

    #[test]
    fn test_custom_ant_count() {
        let config = ColonyConfig::default().with_num_ants(3).with_seed(8);
        let engine = ColonyEngine::new(&scattered(), config).expect("valid");
        assert_eq!(engine.current_ants().len(), 3);
    }

    #[test]
    fn test_pheromone_reinforces_best_edges() {
        let config = ColonyConfig::default().with_iterations(20).with_seed(12);
        let mut engine = ColonyEngine::new(&square(), config).expect("valid");
        engine.solve();
        let p = engine.pheromone();
        // Sides of the unit square are on the optimal tour, diagonals are not.
        assert!(p.get(1, 2) > p.get(1, 3));
        assert!(p.is_symmetric(1e-9));
    }
}
