//! Ordered fallback chains
//!
//! A metric that has several interchangeable solvers is computed by trying
//! each [`Strategy`] in priority order. A failing strategy is logged and the
//! next one is tried; the first success wins.

use super::common::{AlgoError, AlgoResult, GraphView};
use super::community::{CommunityAlgorithm, Partition};
use super::eigenvector::{eigenvector_dense, eigenvector_sparse, EigenvectorConfig};
use tracing::warn;

/// One way of computing a value from a graph view
pub trait Strategy<T> {
    /// Stable name, used in logs and provenance
    fn name(&self) -> &'static str;

    fn run(&self, view: &GraphView) -> AlgoResult<T>;
}

/// Result of a chain that produced a value
#[derive(Debug, Clone)]
pub struct ChainOutcome<T> {
    pub value: T,
    /// Name of the strategy that succeeded
    pub strategy: &'static str,
    /// Strategies that were tried first and failed
    pub failures: Vec<(&'static str, AlgoError)>,
}

/// Try every strategy in order. Returns all failures when none succeeds.
pub fn run_chain<T>(
    view: &GraphView,
    chain: &[&dyn Strategy<T>],
) -> Result<ChainOutcome<T>, Vec<(&'static str, AlgoError)>> {
    let mut failures = Vec::new();
    for strategy in chain {
        match strategy.run(view) {
            Ok(value) => {
                return Ok(ChainOutcome {
                    value,
                    strategy: strategy.name(),
                    failures,
                })
            }
            Err(e) => {
                warn!(strategy = strategy.name(), error = %e, "strategy failed, trying next");
                failures.push((strategy.name(), e));
            }
        }
    }
    Err(failures)
}

/// Eigenvector solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EigenvectorSolver {
    Sparse,
    Dense,
}

#[derive(Debug, Clone, Copy)]
pub struct EigenvectorStrategy {
    pub solver: EigenvectorSolver,
    pub config: EigenvectorConfig,
}

impl Strategy<Vec<f64>> for EigenvectorStrategy {
    fn name(&self) -> &'static str {
        match self.solver {
            EigenvectorSolver::Sparse => "sparse_power_iteration",
            EigenvectorSolver::Dense => "dense_power_iteration",
        }
    }

    fn run(&self, view: &GraphView) -> AlgoResult<Vec<f64>> {
        match self.solver {
            EigenvectorSolver::Sparse => eigenvector_sparse(view, &self.config),
            EigenvectorSolver::Dense => eigenvector_dense(view, &self.config),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CommunityStrategy {
    pub algorithm: CommunityAlgorithm,
    pub seed: u64,
}

impl Strategy<Partition> for CommunityStrategy {
    fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    fn run(&self, view: &GraphView) -> AlgoResult<Partition> {
        let partition = self.algorithm.detect(view, self.seed)?;
        if partition.membership.len() != view.node_count {
            return Err(AlgoError::NumericalFailure(format!(
                "partition covers {} of {} nodes",
                partition.membership.len(),
                view.node_count
            )));
        }
        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl Strategy<u32> for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn run(&self, _view: &GraphView) -> AlgoResult<u32> {
            Err(AlgoError::Unavailable("always".to_string()))
        }
    }

    struct Constant(u32);

    impl Strategy<u32> for Constant {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn run(&self, _view: &GraphView) -> AlgoResult<u32> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_first_success_wins() {
        let view = GraphView::from_edges(1, &[]);
        let chain: [&dyn Strategy<u32>; 3] = [&Failing, &Constant(3), &Constant(4)];
        let outcome = run_chain(&view, &chain).unwrap();

        assert_eq!(outcome.value, 3);
        assert_eq!(outcome.strategy, "constant");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "failing");
    }

    #[test]
    fn test_all_failures_are_reported() {
        let view = GraphView::from_edges(1, &[]);
        let chain: [&dyn Strategy<u32>; 2] = [&Failing, &Failing];
        let failures = run_chain(&view, &chain).unwrap_err();
        assert_eq!(failures.len(), 2);
    }

    #[test]
    fn test_eigenvector_falls_back_to_dense() {
        // Sparse solver gets no iterations; the dense one has a real budget
        let view = GraphView::from_unweighted(3, &[(0, 1), (1, 2)]);
        let starved = EigenvectorStrategy {
            solver: EigenvectorSolver::Sparse,
            config: EigenvectorConfig {
                max_iter: 0,
                tolerance: 1e-6,
            },
        };
        let dense = EigenvectorStrategy {
            solver: EigenvectorSolver::Dense,
            config: EigenvectorConfig::default(),
        };

        let chain: [&dyn Strategy<Vec<f64>>; 2] = [&starved, &dense];
        let outcome = run_chain(&view, &chain).unwrap();
        assert_eq!(outcome.strategy, "dense_power_iteration");
        assert!(outcome.value[1] > outcome.value[0]);
    }

    #[test]
    fn test_community_chain_reaches_greedy_on_edgeless_graph() {
        let view = GraphView::from_edges(4, &[]);
        let fast = CommunityStrategy {
            algorithm: CommunityAlgorithm::FastLouvain,
            seed: 42,
        };
        let classic = CommunityStrategy {
            algorithm: CommunityAlgorithm::Louvain,
            seed: 42,
        };
        let greedy = CommunityStrategy {
            algorithm: CommunityAlgorithm::GreedyModularity,
            seed: 42,
        };

        let chain: [&dyn Strategy<Partition>; 3] = [&fast, &classic, &greedy];
        let outcome = run_chain(&view, &chain).unwrap();
        assert_eq!(outcome.strategy, "greedy_modularity");
        assert_eq!(outcome.value.community_count, 4);
        assert_eq!(outcome.failures.len(), 2);
    }
}
