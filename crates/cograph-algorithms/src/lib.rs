//! Topology algorithms for Cograph
//!
//! Everything here works on a dense, index-based [`GraphView`] and knows
//! nothing about datasets or node identities. Numerical solvers report
//! failure through [`AlgoError`] so callers can fall back to another
//! [`Strategy`].

pub mod common;
pub mod degree;
pub mod pathfinding;
pub mod betweenness;
pub mod eigenvector;
pub mod community;
pub mod strategy;

pub use common::{AlgoError, AlgoResult, GraphView};
pub use degree::{degree_stats, DegreeStats};
pub use pathfinding::{shortest_path_dag, PathMetric, ShortestPathDag};
pub use betweenness::{
    betweenness_exact, betweenness_sampled, default_sample_size, theoretical_max,
    BetweennessConfig,
};
pub use eigenvector::{eigenvector_dense, eigenvector_sparse, EigenvectorConfig, DENSE_NODE_LIMIT};
pub use community::{
    fast_louvain, greedy_modularity, louvain, modularity, CommunityAlgorithm, Partition,
};
pub use strategy::{
    run_chain, ChainOutcome, CommunityStrategy, EigenvectorSolver, EigenvectorStrategy, Strategy,
};
