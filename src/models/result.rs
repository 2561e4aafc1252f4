//! Solver output envelope.

use serde::{Deserialize, Serialize};

use crate::metrics::RunMetrics;

/// Result of a tour solver run.
///
/// A failed run (degenerate graph, unreachable city, missing closing edge)
/// has `path == None` and an infinite `cost`.
///
/// # Examples
///
/// ```
/// use u_tour::models::PathResult;
/// use u_tour::metrics::RunMetrics;
///
/// let ok = PathResult::new(vec![1, 2, 1], 4.0, RunMetrics::new());
/// assert!(ok.is_success());
///
/// let failed = PathResult::failure();
/// assert!(failed.path.is_none());
/// assert!(failed.cost.is_infinite());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathResult {
    /// Closed city sequence, or `None` on failure.
    pub path: Option<Vec<usize>>,
    /// Total cost, `f64::INFINITY` on failure.
    pub cost: f64,
    /// Timing and counters of the run.
    pub metrics: RunMetrics,
}

impl PathResult {
    /// Creates a successful result.
    pub fn new(path: Vec<usize>, cost: f64, metrics: RunMetrics) -> Self {
        Self {
            path: Some(path),
            cost,
            metrics,
        }
    }

    /// Creates a failure result with empty metrics.
    pub fn failure() -> Self {
        Self::failure_with(RunMetrics::new())
    }

    /// Creates a failure result carrying the metrics collected so far.
    pub fn failure_with(metrics: RunMetrics) -> Self {
        Self {
            path: None,
            cost: f64::INFINITY,
            metrics,
        }
    }

    /// Returns `true` if a path with finite cost was found.
    pub fn is_success(&self) -> bool {
        self.path.is_some() && self.cost.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_keeps_metrics() {
        let mut metrics = RunMetrics::new();
        metrics.add_iterations(3);
        let result = PathResult::failure_with(metrics);
        assert!(!result.is_success());
        assert_eq!(result.metrics.iterations(), 3);
    }

    #[test]
    fn test_infinite_cost_is_not_success() {
        let result = PathResult::new(vec![1, 2, 1], f64::INFINITY, RunMetrics::new());
        assert!(!result.is_success());
    }
}
