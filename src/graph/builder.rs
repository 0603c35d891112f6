//! Co-occurrence graph construction
//!
//! Cost is dominated by the pair updates: a row with `k` populated selected
//! fields produces `k * (k - 1) / 2` edge increments, so selecting many fields
//! on a large dataset is expensive. Nothing here caps that; `min_weight` only
//! filters after the fact.

use super::cooccurrence::CooccurrenceGraph;
use super::identity::NodeIdentity;
use crate::dataset::Dataset;
use crate::error::{CographError, CographResult};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Options for [`build`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Edges lighter than this are removed after construction, along with
    /// the nodes they leave isolated. Must be at least 1.
    pub min_weight: u64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { min_weight: 1 }
    }
}

impl BuildOptions {
    pub fn with_min_weight(min_weight: u64) -> Self {
        Self { min_weight }
    }

    pub fn validate(&self) -> CographResult<()> {
        if self.min_weight == 0 {
            return Err(CographError::InvalidMinWeight(self.min_weight));
        }
        Ok(())
    }
}

/// Resolve field names to column positions. Duplicates keep their first
/// occurrence; every unknown name is reported at once.
fn resolve_fields<S: AsRef<str>>(
    dataset: &Dataset,
    fields: &[S],
) -> CographResult<Vec<(String, usize)>> {
    if fields.is_empty() {
        return Err(CographError::EmptyFieldSelection);
    }

    let mut resolved: Vec<(String, usize)> = Vec::with_capacity(fields.len());
    let mut unknown = Vec::new();
    for field in fields {
        let name = field.as_ref();
        if resolved.iter().any(|(n, _)| n == name) {
            debug!(field = name, "ignoring duplicate field");
            continue;
        }
        match dataset.column_index(name) {
            Some(col) => resolved.push((name.to_string(), col)),
            None => unknown.push(name.to_string()),
        }
    }

    if !unknown.is_empty() {
        return Err(CographError::UnknownFields { fields: unknown });
    }
    Ok(resolved)
}

/// Build the co-occurrence graph of `fields` over every row of `dataset`.
///
/// One node per distinct non-missing `(field, value)`; one unit of edge weight
/// per row for every pair of populated selected fields in that row. With
/// `min_weight > 1` the graph is pruned once construction is complete.
///
/// A dataset without qualifying rows yields an empty graph.
pub fn build<S: AsRef<str>>(
    dataset: &Dataset,
    fields: &[S],
    options: &BuildOptions,
) -> CographResult<CooccurrenceGraph> {
    options.validate()?;
    let fields = resolve_fields(dataset, fields)?;
    let mut graph = CooccurrenceGraph::new();

    // Nodes: field order first, then first appearance of each value
    let mut lookup: Vec<FxHashMap<&str, usize>> = Vec::with_capacity(fields.len());
    for (name, col) in &fields {
        let mut values = FxHashMap::default();
        for row in 0..dataset.row_count() {
            if let Some(value) = dataset.value(row, *col) {
                if !values.contains_key(value) {
                    let idx = graph.add_node(NodeIdentity::new(name.as_str(), value));
                    values.insert(value, idx);
                }
            }
        }
        lookup.push(values);
    }

    // Edges: every unordered pair of distinct qualifying nodes per row
    let mut items: Vec<usize> = Vec::with_capacity(fields.len());
    for row in 0..dataset.row_count() {
        items.clear();
        for (f, (_, col)) in fields.iter().enumerate() {
            let idx = dataset
                .value(row, *col)
                .and_then(|value| lookup[f].get(value).copied());
            if let Some(idx) = idx {
                if !items.contains(&idx) {
                    items.push(idx);
                }
            }
        }
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                graph.increment_edge(items[i], items[j]);
            }
        }
    }

    info!(
        rows = dataset.row_count(),
        fields = fields.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built co-occurrence graph"
    );

    if options.min_weight > 1 {
        graph.prune(options.min_weight);
        info!(
            min_weight = options.min_weight,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "pruned co-occurrence graph"
        );
    }

    Ok(graph)
}
