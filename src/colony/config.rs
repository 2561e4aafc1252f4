//! Ant System configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of consecutive non-improving generations before a run stops.
pub const DEFAULT_STAGNATION_LIMIT: usize = 50;

/// Configuration for the Ant System colony.
///
/// # Examples
///
/// ```
/// use u_tour::colony::ColonyConfig;
///
/// let config = ColonyConfig::default()
///     .with_iterations(200)
///     .with_alpha(1.0)
///     .with_beta(2.0)
///     .with_rho(0.3)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Generation budget.
    pub iterations: usize,

    /// Pheromone exponent. Higher values follow learned trails more.
    pub alpha: f64,

    /// Heuristic exponent applied to `1 / distance`.
    pub beta: f64,

    /// Evaporation rate in `[0, 1]`.
    pub rho: f64,

    /// Deposit constant: each ant adds `q / tour_length` per edge.
    pub q: f64,

    /// Initial pheromone on every edge.
    pub tau0: f64,

    /// Consecutive non-improving generations before stopping. 0 = no limit.
    pub stagnation_limit: usize,

    /// Ants per generation. `None` = one ant per city.
    pub num_ants: Option<usize>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            alpha: 1.0,
            beta: 3.0,
            rho: 0.5,
            q: 100.0,
            tau0: 1e-5,
            stagnation_limit: DEFAULT_STAGNATION_LIMIT,
            num_ants: None,
            seed: None,
        }
    }
}

impl ColonyConfig {
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_tau0(mut self, tau0: f64) -> Self {
        self.tau0 = tau0;
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = Some(n);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of ants for a graph with `num_cities` cities.
    pub fn ants_for(&self, num_cities: usize) -> usize {
        self.num_ants.unwrap_or(num_cities)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("alpha", self.alpha, "a finite value >= 0", |v| v >= 0.0)?;
        check("beta", self.beta, "a finite value >= 0", |v| v >= 0.0)?;
        check("rho", self.rho, "[0, 1]", |v| (0.0..=1.0).contains(&v))?;
        check("q", self.q, "a finite value >= 0", |v| v >= 0.0)?;
        check("tau0", self.tau0, "a finite value > 0", |v| v > 0.0)?;
        if self.num_ants == Some(0) {
            return Err(ConfigError::NoAnts);
        }
        Ok(())
    }
}

fn check(
    name: &'static str,
    value: f64,
    expected: &'static str,
    ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ColonyConfig::default();
        assert_eq!(config.iterations, 100);
        assert!((config.beta - 3.0).abs() < 1e-10);
        assert!((config.tau0 - 1e-5).abs() < 1e-15);
        assert_eq!(config.stagnation_limit, DEFAULT_STAGNATION_LIMIT);
        assert_eq!(config.ants_for(12), 12);
    }

    #[test]
    fn test_validate_ok() {
        assert!(ColonyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_rho() {
        let err = ColonyConfig::default().with_rho(1.5).validate().unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { name: "rho", .. }));
    }

    #[test]
    fn test_validate_bad_tau0() {
        assert!(ColonyConfig::default().with_tau0(0.0).validate().is_err());
        assert!(ColonyConfig::default()
            .with_tau0(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_negative_q() {
        assert!(ColonyConfig::default().with_q(-1.0).validate().is_err());
    }

    #[test]
    fn test_validate_nan_alpha() {
        assert!(ColonyConfig::default().with_alpha(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_zero_ants() {
        assert_eq!(
            ColonyConfig::default().with_num_ants(0).validate(),
            Err(ConfigError::NoAnts)
        );
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: ColonyConfig =
            serde_json::from_str(r#"{ "iterations": 20, "seed": 3 }"#).expect("valid json");
        assert_eq!(config.iterations, 20);
        assert_eq!(config.seed, Some(3));
        assert!((config.rho - 0.5).abs() < 1e-10);
        assert_eq!(config.num_ants, None);
    }
}
