//! Weighted undirected co-occurrence graph

use super::identity::NodeIdentity;
use cograph_algorithms::GraphView;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

/// Nodes are field-qualified values; an edge `{u, v}` with weight `w` means
/// the two values appeared together in `w` rows.
///
/// Nodes keep their creation order and edges keep the order of their first
/// co-occurrence, so every traversal is deterministic. There is at most one
/// edge per unordered pair and never a self-loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooccurrenceGraph {
    nodes: IndexSet<NodeIdentity>,
    /// Keyed by `(min index, max index)`
    edges: IndexMap<(usize, usize), u64, FxBuildHasher>,
}

/// Borrowed view of one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRef<'g> {
    pub u: &'g NodeIdentity,
    pub v: &'g NodeIdentity,
    pub weight: u64,
}

impl CooccurrenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of all edge weights
    pub fn total_weight(&self) -> u64 {
        self.edges.values().sum()
    }

    /// Weighted degree of every node, indexed like [`Self::node`]
    pub fn weighted_degrees(&self) -> Vec<u64> {
        let mut degrees = vec![0u64; self.nodes.len()];
        for (&(u, v), &w) in &self.edges {
            degrees[u] += w;
            degrees[v] += w;
        }
        degrees
    }

    /// Insert a node if absent and return its dense index
    pub(crate) fn add_node(&mut self, identity: NodeIdentity) -> usize {
        self.nodes.insert_full(identity).0
    }

    /// Add one co-occurrence between two node indices. Self-pairs are ignored.
    pub(crate) fn increment_edge(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        *self.edges.entry(key).or_insert(0) += 1;
    }

    pub fn contains_node(&self, identity: &NodeIdentity) -> bool {
        self.nodes.contains(identity)
    }

    pub fn node_index(&self, identity: &NodeIdentity) -> Option<usize> {
        self.nodes.get_index_of(identity)
    }

    /// Node by dense index
    pub fn node(&self, idx: usize) -> Option<&NodeIdentity> {
        self.nodes.get_index(idx)
    }

    /// Nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeIdentity> + '_ {
        self.nodes.iter()
    }

    /// Edges in order of first co-occurrence
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        self.edges.iter().map(move |(&(u, v), &weight)| EdgeRef {
            u: &self.nodes[u],
            v: &self.nodes[v],
            weight,
        })
    }

    /// Weight of the edge between two nodes, in either order
    pub fn edge_weight(&self, a: &NodeIdentity, b: &NodeIdentity) -> Option<u64> {
        let ia = self.node_index(a)?;
        let ib = self.node_index(b)?;
        let key = if ia < ib { (ia, ib) } else { (ib, ia) };
        self.edges.get(&key).copied()
    }

    /// Sum of the weights of edges incident to a node
    pub fn weighted_degree(&self, identity: &NodeIdentity) -> Option<u64> {
        let idx = self.node_index(identity)?;
        Some(
            self.edges
                .iter()
                .filter(|((u, v), _)| *u == idx || *v == idx)
                .map(|(_, w)| *w)
                .sum(),
        )
    }

    /// Remove edges lighter than `min_weight`, then every node left without
    /// edges. A threshold of 0 or 1 keeps the graph unchanged.
    pub fn prune(&mut self, min_weight: u64) {
        if min_weight <= 1 {
            return;
        }
        self.edges.retain(|_, w| *w >= min_weight);

        let mut connected = vec![false; self.nodes.len()];
        for &(u, v) in self.edges.keys() {
            connected[u] = true;
            connected[v] = true;
        }

        let mut remap = vec![usize::MAX; self.nodes.len()];
        let mut kept = IndexSet::with_capacity(self.nodes.len());
        for (idx, node) in std::mem::take(&mut self.nodes).into_iter().enumerate() {
            if connected[idx] {
                remap[idx] = kept.len();
                kept.insert(node);
            }
        }
        self.nodes = kept;

        self.edges = std::mem::take(&mut self.edges)
            .into_iter()
            .map(|((u, v), w)| ((remap[u], remap[v]), w))
            .collect();
    }

    /// Dense view for the algorithms crate; indices match [`Self::node`]
    pub fn to_view(&self) -> GraphView {
        let edges: Vec<(usize, usize, f64)> = self
            .edges
            .iter()
            .map(|(&(u, v), &w)| (u, v, w as f64))
            .collect();
        GraphView::from_edges(self.nodes.len(), &edges)
    }
}
