//! Weighted graph input type.

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// A weighted edge between two nodes.
///
/// A non-finite weight marks the edge as absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// First endpoint (1-based node id).
    pub from: usize,
    /// Second endpoint (1-based node id).
    pub to: usize,
    /// Edge weight; `f64::INFINITY` means "absent".
    pub weight: f64,
}

impl Edge {
    /// Creates an edge.
    pub fn new(from: usize, to: usize, weight: f64) -> Self {
        Self { from, to, weight }
    }

    /// Returns `true` if the edge has a finite weight.
    pub fn is_present(&self) -> bool {
        self.weight.is_finite()
    }

    /// Returns `true` if both endpoints are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// A graph over nodes `1..=node_count` with an ordered list of weighted edges.
///
/// Built once, then read by the solvers. Edges may be given once per
/// direction; the solvers treat the graph as undirected.
///
/// # Examples
///
/// ```
/// use u_tour::models::WeightedGraph;
///
/// let mut g = WeightedGraph::new(3);
/// g.add_edge(1, 2, 4.0).unwrap();
/// g.add_edge(2, 3, 5.0).unwrap();
/// assert_eq!(g.node_count(), 3);
/// assert_eq!(g.edge_weight(2, 1), Some(4.0));
/// assert_eq!(g.edge_weight(1, 3), None);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightedGraph {
    node_count: usize,
    edges: Vec<Edge>,
}

impl WeightedGraph {
    /// Creates a graph with `node_count` nodes and no edges.
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
        }
    }

    /// Creates a graph from an edge list.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut graph = Self::new(node_count);
        for (from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    /// Creates a complete graph whose weights are Euclidean distances
    /// between the given points. Point `k` (0-based) becomes node `k + 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tour::models::WeightedGraph;
    ///
    /// let g = WeightedGraph::from_points(&[(0.0, 0.0), (3.0, 4.0)]);
    /// assert_eq!(g.edge_weight(1, 2), Some(5.0));
    /// ```
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut graph = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                graph.edges.push(Edge::new(i + 1, j + 1, (dx * dx + dy * dy).sqrt()));
            }
        }
        graph
    }

    /// Creates a graph from a square weight matrix.
    ///
    /// Row `i`, column `j` (0-based) becomes an edge `i+1 -> j+1`. The
    /// diagonal is ignored and non-finite entries are treated as absent.
    pub fn from_matrix(matrix: &[Vec<f64>]) -> Result<Self, GraphError> {
        let n = matrix.len();
        let mut graph = Self::new(n);
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(GraphError::NotSquare {
                    row: i,
                    len: row.len(),
                    expected: n,
                });
            }
            for (j, &weight) in row.iter().enumerate() {
                if i != j && weight.is_finite() {
                    graph.add_edge(i + 1, j + 1, weight)?;
                }
            }
        }
        Ok(graph)
    }

    /// Appends an edge.
    ///
    /// Infinite weights are accepted and recorded as absent edges.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) -> Result<(), GraphError> {
        for node in [from, to] {
            if node == 0 || node > self.node_count {
                return Err(GraphError::NodeOutOfRange {
                    node,
                    node_count: self.node_count,
                });
            }
        }
        if weight.is_nan() || weight < 0.0 {
            return Err(GraphError::InvalidWeight { from, to, weight });
        }
        self.edges.push(Edge::new(from, to, weight));
        Ok(())
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Weight of the edge between `u` and `v` in either direction.
    ///
    /// The last matching edge wins. Returns `None` if no present edge exists.
    pub fn edge_weight(&self, u: usize, v: usize) -> Option<f64> {
        self.edges
            .iter()
            .rev()
            .find(|e| (e.from == u && e.to == v) || (e.from == v && e.to == u))
            .map(|e| e.weight)
            .filter(|w| w.is_finite())
    }

    /// Returns `true` if every pair given in both directions carries the
    /// same weight (within `tol`).
    pub fn is_symmetric(&self, tol: f64) -> bool {
        self.edges.iter().all(|e| {
            self.edges
                .iter()
                .filter(|o| o.from == e.to && o.to == e.from)
                .all(|o| o.weight == e.weight || (o.weight - e.weight).abs() <= tol)
        })
    }
}
