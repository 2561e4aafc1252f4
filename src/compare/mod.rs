//! Side-by-side benchmark of the colony against farthest insertion.
//!
//! Runs each solver several times on the same graph and reports the best
//! cost found and the average wall-clock time per run.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::colony::{ColonyConfig, ColonyEngine};
use crate::constructive::farthest_insertion;
use crate::error::ConfigError;
use crate::models::WeightedGraph;

/// Aggregated statistics for one solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSummary {
    /// Lowest cost over all runs (`f64::INFINITY` if every run failed).
    pub best_cost: f64,
    /// Mean elapsed milliseconds per run.
    pub average_millis: f64,
    /// Number of runs that produced a feasible tour.
    pub successes: usize,
}

/// Result of [`compare_solvers`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Runs per solver.
    pub runs: usize,
    /// Farthest insertion statistics.
    pub farthest_insertion: SolverSummary,
    /// Ant colony statistics.
    pub colony: SolverSummary,
}

impl ComparisonReport {
    /// Relative gap of the colony's best cost over farthest insertion's,
    /// `(colony - fi) / fi`. `None` unless both solvers found a tour.
    pub fn colony_gap(&self) -> Option<f64> {
        let fi = self.farthest_insertion.best_cost;
        let aco = self.colony.best_cost;
        (fi.is_finite() && aco.is_finite() && fi > 0.0).then(|| (aco - fi) / fi)
    }
}

#[derive(Default)]
struct Accumulator {
    best_cost: Option<f64>,
    total_millis: f64,
    successes: usize,
}

impl Accumulator {
    fn record(&mut self, cost: f64, success: bool, millis: f64) {
        self.total_millis += millis;
        if success {
            self.successes += 1;
            self.best_cost = Some(self.best_cost.map_or(cost, |b| b.min(cost)));
        }
    }

    fn finish(self, runs: usize) -> SolverSummary {
        SolverSummary {
            best_cost: self.best_cost.unwrap_or(f64::INFINITY),
            average_millis: if runs == 0 {
                0.0
            } else {
                self.total_millis / runs as f64
            },
            successes: self.successes,
        }
    }
}

/// Runs farthest insertion and the colony `runs` times each on `graph`.
///
/// When `config.seed` is set, colony run `k` uses seed `seed + k`, so the
/// whole comparison is reproducible.
///
/// # Examples
///
/// ```
/// use u_tour::colony::ColonyConfig;
/// use u_tour::compare::compare_solvers;
/// use u_tour::models::WeightedGraph;
///
/// let g = WeightedGraph::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let report = compare_solvers(&g, 3, &ColonyConfig::default().with_seed(1)).unwrap();
/// assert_eq!(report.runs, 3);
/// assert!((report.farthest_insertion.best_cost - 4.0).abs() < 1e-9);
/// ```
pub fn compare_solvers(
    graph: &WeightedGraph,
    runs: usize,
    config: &ColonyConfig,
) -> Result<ComparisonReport, ConfigError> {
    config.validate()?;

    let mut fi = Accumulator::default();
    for _ in 0..runs {
        let result = farthest_insertion(graph);
        fi.record(result.cost, result.is_success(), result.metrics.elapsed_millis());
    }

    let mut aco = Accumulator::default();
    for run in 0..runs {
        let mut run_config = config.clone();
        run_config.seed = config.seed.map(|s| s.wrapping_add(run as u64));
        let mut engine = ColonyEngine::new(graph, run_config)?;
        let result = engine.solve();
        aco.record(result.cost, result.is_success(), result.metrics.elapsed_millis());
    }

    let report = ComparisonReport {
        runs,
        farthest_insertion: fi.finish(runs),
        colony: aco.finish(runs),
    };
    info!(
        runs,
        fi_cost = report.farthest_insertion.best_cost,
        fi_avg_ms = report.farthest_insertion.average_millis,
        aco_cost = report.colony.best_cost,
        aco_avg_ms = report.colony.average_millis,
        "solver comparison finished"
    );
    Ok(report)
}
