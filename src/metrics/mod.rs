//! Run instrumentation.
//!
//! [`RunMetrics`] is purely observational: solvers record elapsed wall-clock
//! time and two counters (loop iterations and elementary operations) without
//! the counters influencing any decision.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Wall-clock timer plus iteration/operation counters.
///
/// # Examples
///
/// ```
/// use u_tour::metrics::RunMetrics;
///
/// let mut m = RunMetrics::new();
/// m.start();
/// m.add_operations(5);
/// m.stop();
/// assert_eq!(m.operations(), 5);
/// assert!(m.elapsed_millis() >= 0.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    iterations: u64,
    operations: u64,
    elapsed: Duration,
    #[serde(skip)]
    started_at: Option<Instant>,
}

impl RunMetrics {
    /// Creates zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a measured span. Spans accumulate until [`reset`](Self::reset).
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stops the timer and adds the time since [`start`](Self::start) to
    /// the accumulated total.
    ///
    /// Does nothing if the timer is not running.
    pub fn stop(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.elapsed += started.elapsed();
        }
    }

    /// Returns `true` between `start` and `stop`.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Total time of all completed spans, plus the open span if the timer
    /// is running.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started) => self.elapsed + started.elapsed(),
            None => self.elapsed,
        }
    }

    /// [`elapsed`](Self::elapsed) in fractional milliseconds.
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1_000.0
    }

    /// Adds to the iteration counter.
    pub fn add_iterations(&mut self, n: u64) {
        self.iterations += n;
    }

    /// Adds to the operation counter.
    pub fn add_operations(&mut self, n: u64) {
        self.operations += n;
    }

    /// Loop iterations counted so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Elementary operations counted so far.
    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Clears counters and timer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut m = RunMetrics::new();
        m.add_iterations(2);
        m.add_iterations(3);
        m.add_operations(10);
        assert_eq!(m.iterations(), 5);
        assert_eq!(m.operations(), 10);
    }

    #[test]
    fn test_stop_without_start() {
        let mut m = RunMetrics::new();
        m.stop();
        assert_eq!(m.elapsed(), Duration::ZERO);
        assert!(!m.is_running());
    }

    #[test]
    fn test_start_stop_records_elapsed() {
        let mut m = RunMetrics::new();
        m.start();
        assert!(m.is_running());
        std::thread::sleep(Duration::from_millis(2));
        m.stop();
        assert!(!m.is_running());
        assert!(m.elapsed() >= Duration::from_millis(2));
        let frozen = m.elapsed();
        assert_eq!(m.elapsed(), frozen);
    }

    #[test]
    fn test_spans_accumulate() {
        let mut m = RunMetrics::new();
        m.start();
        std::thread::sleep(Duration::from_millis(2));
        m.stop();
        std::thread::sleep(Duration::from_millis(5));
        m.start();
        std::thread::sleep(Duration::from_millis(2));
        m.stop();
        assert!(m.elapsed() >= Duration::from_millis(4));
        let frozen = m.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(m.elapsed(), frozen);
    }

    #[test]
    fn test_reset() {
        let mut m = RunMetrics::new();
        m.start();
        m.add_operations(4);
        m.reset();
        assert_eq!(m.operations(), 0);
        assert!(!m.is_running());
    }
}
