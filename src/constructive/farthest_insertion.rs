//! Farthest insertion heuristic for closed tours.
//!
//! # Algorithm
//!
//! 1. Seed a two-city cycle `[u, v, u]` with the heaviest finite edge
//! 2. Pick the unvisited city whose nearest cycle city is farthest away:
//!
//!    r* = argmax_r min_{c in cycle} d(c, r)
//!
//! 3. Insert it between the consecutive cycle cities (i, j) minimizing
//!
//!    d(i, r) + d(r, j) - d(i, j)
//!
//! 4. Repeat until every city is in the cycle
//!
//! Deterministic: ties go to the first candidate in ascending city order and
//! to the first edge in cycle order.
//!
//! # Complexity
//!
//! O(n³): each of the n insertion rounds scans O(n) candidates against an
//! O(n) cycle.
//!
//! # Reference
//!
//! Rosenkrantz, D.J., Stearns, R.E. & Lewis, P.M. (1977). "An Analysis of
//! Several Heuristics for the Traveling Salesman Problem", *SIAM Journal on
//! Computing* 6(3), 563-581.

use tracing::info;

use crate::distance::DistanceMatrix;
use crate::metrics::RunMetrics;
use crate::models::{PathResult, WeightedGraph};

/// Builds a closed tour with the farthest insertion heuristic.
///
/// Returns a failure result when the graph has fewer than two nodes, has no
/// finite edge to seed from, or some city cannot be connected to the cycle.
///
/// # Examples
///
/// ```
/// use u_tour::models::WeightedGraph;
/// use u_tour::constructive::farthest_insertion;
///
/// let d = 2f64.sqrt();
/// let g = WeightedGraph::from_edges(4, [
///     (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (4, 1, 1.0),
///     (1, 3, d), (2, 4, d),
/// ]).unwrap();
///
/// let result = farthest_insertion(&g);
/// assert_eq!(result.path, Some(vec![1, 2, 3, 4, 1]));
/// assert!((result.cost - 4.0).abs() < 1e-10);
/// ```
pub fn farthest_insertion(graph: &WeightedGraph) -> PathResult {
    let mut metrics = RunMetrics::new();
    metrics.start();

    let n = graph.node_count();
    if n < 2 {
        metrics.stop();
        return PathResult::failure_with(metrics);
    }

    let Some((u, v)) = heaviest_edge(graph, &mut metrics) else {
        metrics.stop();
        return PathResult::failure_with(metrics);
    };

    let distances = DistanceMatrix::from_graph(graph);
    let mut cycle = vec![u, v, u];
    let mut unvisited: Vec<usize> = (1..=n).filter(|&c| c != u && c != v).collect();

    while !unvisited.is_empty() {
        metrics.add_iterations(1);

        let Some(pos) = farthest_candidate(&unvisited, &cycle, &distances, &mut metrics) else {
            break;
        };
        let r = unvisited[pos];

        let Some(k) = cheapest_insertion(r, &cycle, &distances, &mut metrics) else {
            break;
        };
        cycle.insert(k + 1, r);
        unvisited.remove(pos);
    }

    if !unvisited.is_empty() {
        metrics.stop();
        info!(
            unreached = ?unvisited,
            "farthest insertion could not connect every city"
        );
        return PathResult::failure_with(metrics);
    }

    metrics.add_operations((cycle.len() - 1) as u64);
    let cost = distances.path_length(&cycle);
    metrics.stop();
    if !cost.is_finite() {
        return PathResult::failure_with(metrics);
    }

    info!(
        cost,
        elapsed_ms = metrics.elapsed_millis(),
        "farthest insertion finished"
    );
    PathResult::new(cycle, cost, metrics)
}

/// Endpoints of the heaviest finite, non-loop edge (first one on ties).
fn heaviest_edge(graph: &WeightedGraph, metrics: &mut RunMetrics) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for edge in graph.edges() {
        metrics.add_operations(1);
        if !edge.is_present() || edge.is_self_loop() {
            continue;
        }
        if best.is_none_or(|(_, _, w)| edge.weight > w) {
            best = Some((edge.from, edge.to, edge.weight));
        }
    }
    best.map(|(u, v, _)| (u, v))
}

/// Index in `unvisited` of the city maximizing its minimum finite distance
/// to the cycle. Cities with no finite distance to the cycle are skipped.
fn farthest_candidate(
    unvisited: &[usize],
    cycle: &[usize],
    distances: &DistanceMatrix,
    metrics: &mut RunMetrics,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (pos, &r) in unvisited.iter().enumerate() {
        metrics.add_operations(cycle.len() as u64);
        let nearest = cycle
            .iter()
            .map(|&c| distances.get(c, r))
            .filter(|d| d.is_finite())
            .reduce(f64::min);
        let Some(nearest) = nearest else {
            continue;
        };
        if best.is_none_or(|(_, d)| nearest > d) {
            best = Some((pos, nearest));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Position `k` such that inserting `r` between `cycle[k]` and `cycle[k + 1]`
/// adds the least length. Edges with a missing leg are skipped.
fn cheapest_insertion(
    r: usize,
    cycle: &[usize],
    distances: &DistanceMatrix,
    metrics: &mut RunMetrics,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (k, w) in cycle.windows(2).enumerate() {
        metrics.add_operations(3);
        let (i, j) = (w[0], w[1]);
        let (ir, rj, ij) = (distances.get(i, r), distances.get(r, j), distances.get(i, j));
        if !(ir.is_finite() && rj.is_finite() && ij.is_finite()) {
            continue;
        }
        let increase = ir + rj - ij;
        if best.is_none_or(|(_, b)| increase < b) {
            best = Some((k, increase));
        }
    }
    best.map(|(k, _)| k)
}
