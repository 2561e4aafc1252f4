//! Pheromone trail matrix.

use tracing::warn;

use super::ant::Ant;

/// Smallest value a trail may decay to.
const PHEROMONE_FLOOR: f64 = f64::MIN_POSITIVE;

/// A dense n×n matrix of pheromone intensities over cities `1..=n`.
///
/// Starts at `tau0` on every off-diagonal pair and stays symmetric and
/// strictly positive: evaporation is floored at the smallest positive
/// `f64` and deposits only add non-negative amounts to both directions.
///
/// # Examples
///
/// ```
/// use u_tour::colony::PheromoneMatrix;
///
/// let mut p = PheromoneMatrix::new(3, 1.0);
/// p.evaporate(0.5);
/// p.deposit(&[1, 2, 3, 1], 2.0);
/// assert!((p.get(1, 2) - 2.5).abs() < 1e-12);
/// assert!((p.get(2, 1) - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct PheromoneMatrix {
    data: Vec<f64>,
    size: usize,
}

impl PheromoneMatrix {
    /// Creates a matrix for `size` cities with `tau0` on every off-diagonal pair.
    pub fn new(size: usize, tau0: f64) -> Self {
        let mut data = vec![tau0; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Self { data, size }
    }

    fn index(&self, from: usize, to: usize) -> usize {
        (from - 1) * self.size + (to - 1)
    }

    /// Trail intensity on `from -> to`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[self.index(from, to)]
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Multiplies every off-diagonal entry by `1 - rho`.
    pub fn evaporate(&mut self, rho: f64) {
        let keep = 1.0 - rho;
        for i in 0..self.size {
            for j in 0..self.size {
                if i != j {
                    let cell = &mut self.data[i * self.size + j];
                    *cell = (*cell * keep).max(PHEROMONE_FLOOR);
                }
            }
        }
    }

    /// Adds `amount` to both directions of every consecutive edge in `cities`.
    pub fn deposit(&mut self, cities: &[usize], amount: f64) {
        for w in cities.windows(2) {
            let (a, b) = (w[0], w[1]);
            if a == b {
                continue;
            }
            let ab = self.index(a, b);
            let ba = self.index(b, a);
            self.data[ab] += amount;
            self.data[ba] += amount;
        }
    }

    /// Ant System global update: evaporate, then let every finished ant
    /// deposit `q / length` on the edges of its tour.
    ///
    /// Ants with a zero or non-finite length are skipped.
    pub fn update(&mut self, ants: &[Ant], rho: f64, q: f64) {
        self.evaporate(rho);
        for ant in ants {
            let Some(length) = ant.length() else {
                continue;
            };
            if length <= 0.0 || !length.is_finite() {
                if length <= 0.0 {
                    warn!(length, "skipping deposit for degenerate tour length");
                }
                continue;
            }
            self.deposit(ant.tour(), q / length);
        }
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 1..=self.size {
            for j in (i + 1)..=self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Smallest off-diagonal entry, or `None` for fewer than two cities.
    pub fn min_off_diagonal(&self) -> Option<f64> {
        (1..=self.size)
            .flat_map(|i| (1..=self.size).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| self.get(i, j))
            .reduce(f64::min)
    }
}
