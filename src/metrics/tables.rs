//! Output tables of the metrics engine

use crate::graph::NodeIdentity;
use serde::{Deserialize, Serialize};

/// One row per node of the (pruned) graph. Every column is always defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetricsRow {
    pub node_id: NodeIdentity,
    /// Display value
    pub label: String,
    /// Field the value came from
    pub source_field: String,
    /// Number of neighbors
    pub degree: usize,
    /// Sum of incident edge weights
    pub degree_weighted: u64,
    /// `degree / (n - 1)`, 0 for a single-node graph
    pub degree_centrality: f64,
    /// Normalized betweenness, exact or estimated
    pub betweenness: f64,
    /// Principal eigenvector component, 0 when no solver succeeded
    pub eigenvector: f64,
    /// Community label, meaningful only within one computation
    pub community: usize,
}

/// One row per edge of the (pruned) graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMetricsRow {
    pub u: NodeIdentity,
    pub v: NodeIdentity,
    pub weight: u64,
}

/// How betweenness was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BetweennessMode {
    /// Fewer than two nodes: every value is 0
    Trivial,
    /// Every node used as a source
    Exact,
    /// `k` sources drawn with `seed`
    Sampled { k: usize, seed: u64 },
}

/// Which strategy produced each metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsProvenance {
    pub betweenness: BetweennessMode,
    /// Solver name, or `neutral_default` when every solver failed
    pub eigenvector: String,
    /// Algorithm name, or `singletons` when every tier failed
    pub community: String,
}

/// Node and edge tables, always returned together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsTables {
    /// Sorted by `degree_weighted` descending, ties by node identity
    pub nodes: Vec<NodeMetricsRow>,
    /// Sorted by weight descending, ties by `(u, v)`
    pub edges: Vec<EdgeMetricsRow>,
    /// Modularity of the community assignment
    pub modularity: f64,
    pub provenance: MetricsProvenance,
}

impl MetricsTables {
    pub fn node(&self, id: &NodeIdentity) -> Option<&NodeMetricsRow> {
        self.nodes.iter().find(|row| &row.node_id == id)
    }

    pub fn community_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|row| row.community + 1)
            .max()
            .unwrap_or(0)
    }
}
