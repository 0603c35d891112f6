//! Cograph
//!
//! Turns tabular data into a weighted co-occurrence graph and computes
//! ranking and community metrics over it, fast enough for interactive
//! exploration.
//!
//! # Pipeline
//!
//! 1. [`Dataset`]: rows of named, possibly-missing values
//! 2. [`graph::build`]: one node per distinct `(field, value)`, one unit of
//!    edge weight per row in which two values appear together
//! 3. [`metrics::compute`]: degree, degree centrality, betweenness (exact or
//!    sampled), eigenvector centrality and communities, with fallbacks that
//!    never fail on numerically difficult graphs
//! 4. [`projection`] / [`export`]: ranking, subsetting and CSV/JSON output
//!
//! ## Example Usage
//!
//! ```rust
//! use cograph::{build_graph, compute_metrics, BuildOptions, Dataset, MetricsConfig, NodeIdentity};
//!
//! let mut dataset = Dataset::new(["A", "B"]);
//! dataset.push(&[Some("x"), Some("p")]).unwrap();
//! dataset.push(&[Some("x"), Some("q")]).unwrap();
//! dataset.push(&[Some("y"), Some("p")]).unwrap();
//!
//! let graph = build_graph(&dataset, &["A", "B"], &BuildOptions::default()).unwrap();
//! assert_eq!(graph.node_count(), 4);
//! assert_eq!(graph.edge_count(), 3);
//!
//! let tables = compute_metrics(&graph, &MetricsConfig::default()).unwrap();
//! let x = tables.node(&NodeIdentity::new("A", "x")).unwrap();
//! assert_eq!(x.degree_weighted, 2);
//! ```
//!
//! Every call is synchronous and owns its state; nothing is shared between
//! calls, so independent requests can run on separate threads freely.

#![warn(clippy::all)]

pub mod dataset;
pub mod error;
pub mod export;
pub mod graph;
pub mod metrics;
pub mod projection;

// Re-export main types for convenience
pub use dataset::Dataset;
pub use error::{CographError, CographResult};
pub use graph::{build as build_graph, BuildOptions, CooccurrenceGraph, EdgeRef, NodeIdentity};
pub use metrics::{
    compute as compute_metrics, BetweennessMode, EdgeMetricsRow, MetricsConfig,
    MetricsProvenance, MetricsTables, NodeMetricsRow,
};
pub use projection::{community_sizes, restrict_edges, top_k, NodeMetric};

pub use cograph_algorithms::{CommunityAlgorithm, EigenvectorConfig, PathMetric};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
