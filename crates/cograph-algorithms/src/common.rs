//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

use thiserror::Error;

/// Errors raised by the numerical algorithms in this crate.
///
/// Callers that must never fail (the metrics engine) treat every variant as
/// "try the next strategy".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgoError {
    #[error("did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("numerical failure: {0}")]
    NumericalFailure(String),

    #[error("degenerate graph: {0}")]
    DegenerateGraph(String),

    #[error("strategy unavailable: {0}")]
    Unavailable(String),
}

pub type AlgoResult<T> = Result<T, AlgoError>;

/// A dense, integer-indexed view of an undirected weighted graph using
/// Compressed Sparse Row (CSR) format.
///
/// Every undirected edge `{u, v}` is stored twice: once in the row of `u`
/// and once in the row of `v`. Self-loops are never stored.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Offsets into `targets`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor node indices
    pub targets: Vec<usize>,
    /// Edge weights, aligned with `targets`
    pub weights: Vec<f64>,
    /// Number of undirected edges
    edge_count: usize,
}

impl GraphView {
    /// Build a view from a list of undirected edges `(u, v, weight)`.
    ///
    /// Edges are expected to be unique per unordered pair. Self-loops are
    /// dropped. Neighbor rows keep the order in which edges were given.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut degree = vec![0usize; node_count];
        let mut edge_count = 0;
        for &(u, v, _) in edges {
            debug_assert!(u < node_count && v < node_count, "edge endpoint out of range");
            if u == v {
                continue;
            }
            degree[u] += 1;
            degree[v] += 1;
            edge_count += 1;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);
        for d in &degree {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + d);
        }

        let total = offsets[node_count];
        let mut targets = vec![0usize; total];
        let mut weights = vec![0.0f64; total];
        let mut cursor: Vec<usize> = offsets[..node_count].to_vec();

        for &(u, v, w) in edges {
            if u == v {
                continue;
            }
            targets[cursor[u]] = v;
            weights[cursor[u]] = w;
            cursor[u] += 1;
            targets[cursor[v]] = u;
            weights[cursor[v]] = w;
            cursor[v] += 1;
        }

        GraphView {
            node_count,
            offsets,
            targets,
            weights,
            edge_count,
        }
    }

    /// Helper for tests and benches: every edge gets weight 1.0
    pub fn from_unweighted(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let weighted: Vec<(usize, usize, f64)> = edges.iter().map(|&(u, v)| (u, v, 1.0)).collect();
        Self::from_edges(node_count, &weighted)
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of neighbors of a node (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Neighbors of a node
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.targets[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Weights of the edges incident to a node, aligned with `neighbors`
    pub fn weights(&self, idx: usize) -> &[f64] {
        &self.weights[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Sum of incident edge weights
    pub fn weighted_degree(&self, idx: usize) -> f64 {
        self.weights(idx).iter().sum()
    }

    /// Sum of all edge weights, each undirected edge counted once
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum::<f64>() / 2.0
    }

    /// Iterate undirected edges once each as `(u, v, weight)` with `u < v`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.node_count).flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .zip(self.weights(u))
                .filter(move |(&v, _)| u < v)
                .map(move |(&v, &w)| (u, v, w))
        })
    }
}
