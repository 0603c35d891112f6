//! Eigenvector centrality
//!
//! Two solvers for the principal eigenvector of the weighted adjacency matrix:
//!
//! - [`eigenvector_sparse`]: power iteration directly on the CSR rows
//! - [`eigenvector_dense`]: the same iteration over a dense `ndarray` matrix
//!
//! Weights are divided by the largest weight first, so scaling every weight
//! by the same factor leaves the result unchanged. Each step multiplies by
//! `A + c I`, where `c` is half the current Rayleigh quotient, so bipartite
//! graphs (every two-field co-occurrence graph) do not oscillate between `λ`
//! and `-λ`.
//!
//! Both return `|x|` scaled to sum to 1 and refuse edgeless graphs, which
//! have no principal direction.

use super::common::{AlgoError, AlgoResult, GraphView};
use ndarray::{Array1, Array2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest graph the dense solver will materialize (n x n matrix of f64)
pub const DENSE_NODE_LIMIT: usize = 4096;

/// Power iteration configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EigenvectorConfig {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Convergence tolerance, scaled by the node count
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iter: 200,
            tolerance: 1e-6,
        }
    }
}

/// Validate the view and return its largest edge weight
fn check_solvable(view: &GraphView) -> AlgoResult<f64> {
    if view.node_count == 0 {
        return Err(AlgoError::DegenerateGraph("graph has no nodes".to_string()));
    }
    if view.edge_count() == 0 {
        return Err(AlgoError::DegenerateGraph("graph has no edges".to_string()));
    }
    if view.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(AlgoError::NumericalFailure(
            "edge weights must be finite and non-negative".to_string(),
        ));
    }
    let max_weight = view.weights.iter().copied().fold(0.0, f64::max);
    if max_weight == 0.0 {
        return Err(AlgoError::DegenerateGraph(
            "every edge has zero weight".to_string(),
        ));
    }
    Ok(max_weight)
}

/// Shift for the next step from the Rayleigh quotient `x·Ax / x·x`
fn shift(rayleigh: f64) -> f64 {
    if rayleigh.is_finite() && rayleigh > 0.0 {
        rayleigh / 2.0
    } else {
        1.0
    }
}

/// Sparse shifted power iteration on the weighted adjacency
pub fn eigenvector_sparse(view: &GraphView, config: &EigenvectorConfig) -> AlgoResult<Vec<f64>> {
    let max_weight = check_solvable(view)?;
    let n = view.node_count;
    let mut x = vec![1.0 / (n as f64).sqrt(); n];
    let mut ax = vec![0.0; n];

    for _ in 0..config.max_iter {
        for i in 0..n {
            ax[i] = view
                .neighbors(i)
                .iter()
                .zip(view.weights(i))
                .map(|(&j, &w)| (w / max_weight) * x[j])
                .sum();
        }
        // x has unit length, so x·Ax is the Rayleigh quotient
        let c = shift(x.iter().zip(&ax).map(|(a, b)| a * b).sum());

        let mut next: Vec<f64> = ax.iter().zip(&x).map(|(a, v)| a + c * v).collect();
        let norm = next.iter().map(|v| v * v).sum::<f64>().sqrt();
        if !norm.is_finite() || norm == 0.0 {
            return Err(AlgoError::NumericalFailure(format!(
                "iteration norm became {norm}"
            )));
        }
        for v in next.iter_mut() {
            *v /= norm;
        }

        let diff: f64 = x.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
        x = next;
        if diff < n as f64 * config.tolerance {
            return Ok(normalize_sum(x.into_iter()));
        }
    }

    Err(AlgoError::NotConverged {
        iterations: config.max_iter,
    })
}

fn normalize_sum(x: impl Iterator<Item = f64>) -> Vec<f64> {
    let abs: Vec<f64> = x.map(f64::abs).collect();
    let sum: f64 = abs.iter().sum();
    if sum == 0.0 {
        return abs;
    }
    abs.into_iter().map(|v| v / sum).collect()
}

/// Dense shifted power iteration on the weighted adjacency
pub fn eigenvector_dense(view: &GraphView, config: &EigenvectorConfig) -> AlgoResult<Vec<f64>> {
    let max_weight = check_solvable(view)?;
    let n = view.node_count;
    if n > DENSE_NODE_LIMIT {
        return Err(AlgoError::Unavailable(format!(
            "dense solver limited to {DENSE_NODE_LIMIT} nodes, graph has {n}"
        )));
    }

    let mut matrix = Array2::<f64>::zeros((n, n));
    for (u, v, w) in view.edges() {
        matrix[[u, v]] = w / max_weight;
        matrix[[v, u]] = w / max_weight;
    }

    let mut x = Array1::<f64>::from_elem(n, 1.0 / (n as f64).sqrt());
    for _ in 0..config.max_iter {
        let ax = matrix.dot(&x);
        let c = shift(x.dot(&ax));

        let mut next = ax + &(&x * c);
        let norm = next.dot(&next).sqrt();
        if !norm.is_finite() || norm == 0.0 {
            return Err(AlgoError::NumericalFailure(format!(
                "iteration norm became {norm}"
            )));
        }
        next /= norm;

        let diff = (&next - &x).mapv(f64::abs).sum();
        x = next;
        if diff < n as f64 * config.tolerance {
            return Ok(normalize_sum(x.iter().copied()));
        }
    }

    Err(AlgoError::NotConverged {
        iterations: config.max_iter,
    })
}
