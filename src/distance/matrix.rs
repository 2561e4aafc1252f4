//! Dense distance matrix.

use tracing::warn;

use crate::models::WeightedGraph;

/// A dense n×n distance matrix over cities `1..=n`, stored in row-major order.
///
/// Pairs without an edge hold `f64::INFINITY`; the diagonal holds zero and
/// is never read by the solvers.
///
/// # Examples
///
/// ```
/// use u_tour::models::WeightedGraph;
/// use u_tour::distance::DistanceMatrix;
///
/// let mut g = WeightedGraph::new(3);
/// g.add_edge(1, 2, 5.0).unwrap();
/// let dm = DistanceMatrix::from_graph(&g);
/// assert_eq!(dm.get(2, 1), 5.0);
/// assert!(dm.get(1, 3).is_infinite());
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix for `size` cities with every off-diagonal pair absent.
    pub fn new(size: usize) -> Self {
        let mut data = vec![f64::INFINITY; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Self { data, size }
    }

    /// Builds a symmetric matrix from a graph.
    ///
    /// Each present edge `(u, v, w)` is written to both `(u, v)` and `(v, u)`.
    /// When a pair is listed twice with different weights the later edge wins.
    /// Self-loops and absent edges are skipped.
    pub fn from_graph(graph: &WeightedGraph) -> Self {
        let mut dm = Self::new(graph.node_count());
        let mut written = vec![false; dm.data.len()];
        for edge in graph.edges() {
            if edge.is_self_loop() || !edge.is_present() {
                continue;
            }
            let idx = dm.index(edge.from, edge.to);
            if written[idx] && dm.data[idx] != edge.weight {
                warn!(
                    from = edge.from,
                    to = edge.to,
                    old = dm.data[idx],
                    new = edge.weight,
                    "asymmetric edge weights, keeping the later one"
                );
            }
            dm.set_symmetric(edge.from, edge.to, edge.weight);
            written[idx] = true;
            written[dm.index(edge.to, edge.from)] = true;
        }
        dm
    }

    fn index(&self, from: usize, to: usize) -> usize {
        (from - 1) * self.size + (to - 1)
    }

    /// Returns the distance from city `from` to city `to`.
    ///
    /// # Panics
    ///
    /// Panics if either id is outside `1..=size`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[self.index(from, to)]
    }

    /// Sets the distance from `from` to `to` only.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        let idx = self.index(from, to);
        self.data[idx] = distance;
    }

    /// Sets the distance in both directions.
    pub fn set_symmetric(&mut self, a: usize, b: usize, distance: f64) {
        self.set(a, b, distance);
        self.set(b, a, distance);
    }

    /// Returns `true` if an edge with finite weight joins the two cities.
    pub fn is_connected(&self, from: usize, to: usize) -> bool {
        from != to && self.get(from, to).is_finite()
    }

    /// Number of cities in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 1..=self.size {
            for j in (i + 1)..=self.size {
                let (a, b) = (self.get(i, j), self.get(j, i));
                if a != b && (a - b).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Sums consecutive distances along a city sequence.
    ///
    /// Returns `f64::INFINITY` if any leg is missing.
    pub fn path_length(&self, cities: &[usize]) -> f64 {
        cities.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }
}
