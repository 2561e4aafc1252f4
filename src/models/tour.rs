//! Closed tour value type.

use serde::{Deserialize, Serialize};

/// A frozen closed tour and its length.
///
/// The city sequence is closed: the first city is repeated at the end.
/// Instances are created once (for example when a colony finds a new best
/// tour) and never change afterwards.
///
/// # Examples
///
/// ```
/// use u_tour::models::Tour;
///
/// let tour = Tour::new(vec![1, 2, 3, 1], 6.0);
/// assert_eq!(tour.num_cities(), 3);
/// assert_eq!(tour.open_path(), &[1, 2, 3]);
/// assert!(tour.is_feasible());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    cities: Vec<usize>,
    length: f64,
}

impl Tour {
    /// Creates a tour from a closed city sequence and its length.
    pub fn new(cities: Vec<usize>, length: f64) -> Self {
        Self { cities, length }
    }

    /// The closed city sequence (`cities[0] == cities[last]`).
    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    /// The city sequence without the closing city.
    pub fn open_path(&self) -> &[usize] {
        match self.cities.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Total length of the closed tour.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of distinct cities visited.
    pub fn num_cities(&self) -> usize {
        self.cities.len().saturating_sub(1)
    }

    /// Returns `true` if every edge of the tour exists (finite length).
    pub fn is_feasible(&self) -> bool {
        self.length.is_finite()
    }

    /// Consumes the tour, returning the closed city sequence.
    pub fn into_cities(self) -> Vec<usize> {
        self.cities
    }
}
