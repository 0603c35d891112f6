//! Result projection: ranking and subsetting of metrics tables for display

use crate::metrics::{EdgeMetricsRow, NodeMetricsRow};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Numeric node columns that can be ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeMetric {
    Degree,
    DegreeWeighted,
    DegreeCentrality,
    Betweenness,
    Eigenvector,
}

impl NodeMetric {
    pub fn column(&self) -> &'static str {
        match self {
            NodeMetric::Degree => "degree",
            NodeMetric::DegreeWeighted => "degree_weighted",
            NodeMetric::DegreeCentrality => "degree_centrality",
            NodeMetric::Betweenness => "betweenness",
            NodeMetric::Eigenvector => "eigenvector",
        }
    }

    pub fn value(&self, row: &NodeMetricsRow) -> f64 {
        match self {
            NodeMetric::Degree => row.degree as f64,
            NodeMetric::DegreeWeighted => row.degree_weighted as f64,
            NodeMetric::DegreeCentrality => row.degree_centrality,
            NodeMetric::Betweenness => row.betweenness,
            NodeMetric::Eigenvector => row.eigenvector,
        }
    }
}

impl fmt::Display for NodeMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for NodeMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "degree" => Ok(NodeMetric::Degree),
            "degree_weighted" => Ok(NodeMetric::DegreeWeighted),
            "degree_centrality" => Ok(NodeMetric::DegreeCentrality),
            "betweenness" => Ok(NodeMetric::Betweenness),
            "eigenvector" => Ok(NodeMetric::Eigenvector),
            other => Err(format!("unknown node metric: {other}")),
        }
    }
}

/// The `k` rows with the greatest `metric`, ties broken by node identity
pub fn top_k(rows: &[NodeMetricsRow], k: usize, metric: NodeMetric) -> Vec<&NodeMetricsRow> {
    let mut ranked: Vec<&NodeMetricsRow> = rows.iter().collect();
    ranked.sort_by(|a, b| {
        metric
            .value(b)
            .total_cmp(&metric.value(a))
            .then_with(|| a.node_id.cmp(&b.node_id))
    });
    ranked.truncate(k);
    ranked
}

/// Edges whose endpoints are both in `nodes`
pub fn restrict_edges<'e>(
    edges: &'e [EdgeMetricsRow],
    nodes: &[&NodeMetricsRow],
) -> Vec<&'e EdgeMetricsRow> {
    let keep: HashSet<_> = nodes.iter().map(|row| &row.node_id).collect();
    edges
        .iter()
        .filter(|e| keep.contains(&e.u) && keep.contains(&e.v))
        .collect()
}

/// `(community, member count)`, largest first, ties by label
pub fn community_sizes(rows: &[NodeMetricsRow]) -> Vec<(usize, usize)> {
    let mut sizes: IndexMap<usize, usize> = IndexMap::new();
    for row in rows {
        *sizes.entry(row.community).or_insert(0) += 1;
    }
    let mut sizes: Vec<(usize, usize)> = sizes.into_iter().collect();
    sizes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sizes
}
