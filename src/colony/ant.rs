//! Single tour-building ant.

use rand::rngs::StdRng;
use rand::Rng;

use super::pheromone::PheromoneMatrix;
use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Distances below this are treated as this value when computing `1/d`.
const MIN_DISTANCE: f64 = 1e-10;

/// Builds one closed tour by probabilistic city selection.
///
/// Each ant owns its random stream, so the sequence of choices it makes
/// depends only on its seed, the pheromone matrix and the distances, not
/// on how its steps are interleaved with other ants.
///
/// While constructing, `tour.len() + unvisited.len() == num_cities` and the
/// tour holds no duplicates. A finished tour has `num_cities + 1` entries
/// with the start city repeated at the end.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_tour::colony::{Ant, PheromoneMatrix};
/// use u_tour::distance::DistanceMatrix;
/// use u_tour::models::WeightedGraph;
///
/// let g = WeightedGraph::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
/// let dm = DistanceMatrix::from_graph(&g);
/// let p = PheromoneMatrix::new(3, 1.0);
///
/// let mut ant = Ant::new(3, StdRng::seed_from_u64(1));
/// ant.start_randomly();
/// ant.construct_tour(&p, &dm, 1.0, 2.0);
/// assert!(ant.is_finished());
/// assert_eq!(ant.tour().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Ant {
    num_cities: usize,
    tour: Vec<usize>,
    unvisited: Vec<usize>,
    length: Option<f64>,
    rng: StdRng,
}

impl Ant {
    /// Creates an idle ant for a graph of `num_cities` cities.
    pub fn new(num_cities: usize, rng: StdRng) -> Self {
        Self {
            num_cities,
            tour: Vec::with_capacity(num_cities + 1),
            unvisited: Vec::with_capacity(num_cities),
            length: None,
            rng,
        }
    }

    /// Resets the ant and places it on a uniformly random start city.
    ///
    /// Returns the start city, or `None` when there are no cities.
    pub fn start_randomly(&mut self) -> Option<usize> {
        self.tour.clear();
        self.unvisited.clear();
        self.length = None;
        if self.num_cities == 0 {
            return None;
        }
        self.unvisited.extend(1..=self.num_cities);
        let start = self
            .unvisited
            .remove(self.rng.random_range(0..self.unvisited.len()));
        self.tour.push(start);
        Some(start)
    }

    /// Chooses the next city from `current` by roulette-wheel selection over
    /// `tau(current, j)^alpha * (1 / d(current, j))^beta`.
    ///
    /// When some scores overflow to infinity, the first such city in
    /// unvisited order wins. Falls back to a uniform choice when the scores
    /// sum to zero. Returns `None` if every city has been visited.
    pub fn select_next_city(
        &mut self,
        current: usize,
        pheromone: &PheromoneMatrix,
        distances: &DistanceMatrix,
        alpha: f64,
        beta: f64,
    ) -> Option<usize> {
        if self.unvisited.is_empty() {
            return None;
        }

        let mut scores: Vec<f64> = self
            .unvisited
            .iter()
            .map(|&j| {
                let tau = pheromone.get(current, j).powf(alpha);
                let eta = (1.0 / distances.get(current, j).max(MIN_DISTANCE)).powf(beta);
                let score = tau * eta;
                if score.is_nan() {
                    0.0
                } else {
                    score
                }
            })
            .collect();
        let mut sum: f64 = scores.iter().sum();

        if sum == f64::INFINITY {
            if let Some(idx) = scores.iter().position(|s| s.is_infinite()) {
                return Some(self.unvisited[idx]);
            }
            // Only the total overflowed: rescale by the largest score.
            let max = scores.iter().copied().fold(0.0, f64::max);
            scores.iter_mut().for_each(|s| *s /= max);
            sum = scores.iter().sum();
        }
        if sum.is_nan() || sum <= 0.0 {
            let idx = self.rng.random_range(0..self.unvisited.len());
            return Some(self.unvisited[idx]);
        }

        let r = self.rng.random::<f64>() * sum;
        let mut acc = 0.0;
        let mut last_positive = self.unvisited[0];
        for (&city, &score) in self.unvisited.iter().zip(&scores) {
            if score <= 0.0 {
                continue;
            }
            acc += score;
            last_positive = city;
            if acc >= r {
                return Some(city);
            }
        }
        // Rounding left acc just below r.
        Some(last_positive)
    }

    fn visit(&mut self, city: usize) {
        if let Some(pos) = self.unvisited.iter().position(|&c| c == city) {
            self.unvisited.remove(pos);
        }
        self.tour.push(city);
    }

    /// Runs the ant to completion and closes the cycle.
    pub fn construct_tour(
        &mut self,
        pheromone: &PheromoneMatrix,
        distances: &DistanceMatrix,
        alpha: f64,
        beta: f64,
    ) {
        while !self.is_finished() {
            if !self.advance_one_step(pheromone, distances, alpha, beta) {
                break;
            }
        }
    }

    /// Appends exactly one city: the next selected city, or the start city
    /// once all cities are in the tour.
    ///
    /// Returns `false` without changing anything when the tour is already
    /// finished or was never started.
    pub fn advance_one_step(
        &mut self,
        pheromone: &PheromoneMatrix,
        distances: &DistanceMatrix,
        alpha: f64,
        beta: f64,
    ) -> bool {
        if self.is_finished() {
            return false;
        }
        let (Some(&start), Some(&current)) = (self.tour.first(), self.tour.last()) else {
            return false;
        };
        if self.tour.len() == self.num_cities {
            self.tour.push(start);
            self.unvisited.clear();
            return true;
        }
        match self.select_next_city(current, pheromone, distances, alpha, beta) {
            Some(next) => {
                self.visit(next);
                true
            }
            None => false,
        }
    }

    /// Returns `true` once the closing edge has been appended.
    pub fn is_finished(&self) -> bool {
        self.num_cities > 0 && self.tour.len() == self.num_cities + 1
    }

    /// Computes and stores the closed tour length.
    ///
    /// Returns `None` if the tour is not finished yet.
    pub fn compute_length(&mut self, distances: &DistanceMatrix) -> Option<f64> {
        if !self.is_finished() {
            return None;
        }
        let length = distances.path_length(&self.tour);
        self.length = Some(length);
        self.length
    }

    /// Length of the tour built so far (without closing edge).
    pub fn partial_length(&self, distances: &DistanceMatrix) -> f64 {
        distances.path_length(&self.tour)
    }

    /// Length computed by [`compute_length`](Self::compute_length).
    pub fn length(&self) -> Option<f64> {
        self.length
    }

    /// Cities visited so far, in order.
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// Cities not yet visited.
    pub fn unvisited(&self) -> &[usize] {
        &self.unvisited
    }

    /// City the ant currently stands on.
    pub fn current_city(&self) -> Option<usize> {
        self.tour.last().copied()
    }

    /// Freezes the finished tour into an independent [`Tour`] value.
    ///
    /// Returns `None` until the length has been computed.
    pub fn snapshot(&self) -> Option<Tour> {
        self.length.map(|length| Tour::new(self.tour.clone(), length))
    }
}
