//! Community detection algorithms
//!
//! Three modularity optimizers, from fastest to most conservative:
//!
//! - [`fast_louvain`]: queue-driven local moving (only nodes whose
//!   neighborhood changed are revisited) followed by aggregation.
//! - [`louvain`]: classic Louvain, full sweeps in a seeded random order
//!   followed by aggregation.
//! - [`greedy_modularity`]: Clauset-Newman-Moore agglomeration, merging the
//!   pair of communities with the largest modularity gain until no merge helps.
//!
//! Every result is a total partition: each node has exactly one label.

use super::common::{AlgoError, AlgoResult, GraphView};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum modularity gain for a node move to count as an improvement
const MOVE_EPSILON: f64 = 1e-10;
/// Minimum modularity gain for another classic Louvain sweep
const MIN_SWEEP_GAIN: f64 = 1e-7;
const MAX_SWEEPS: usize = 1000;
/// Queue visits allowed per node before fast local moving gives up
const MAX_VISITS_PER_NODE: usize = 1000;

/// The community detection algorithms, in default priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CommunityAlgorithm {
    FastLouvain,
    Louvain,
    GreedyModularity,
}

impl CommunityAlgorithm {
    pub const ALL: [CommunityAlgorithm; 3] = [
        CommunityAlgorithm::FastLouvain,
        CommunityAlgorithm::Louvain,
        CommunityAlgorithm::GreedyModularity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CommunityAlgorithm::FastLouvain => "fast_louvain",
            CommunityAlgorithm::Louvain => "louvain",
            CommunityAlgorithm::GreedyModularity => "greedy_modularity",
        }
    }

    /// Run the algorithm. `seed` is only used by [`CommunityAlgorithm::Louvain`].
    pub fn detect(&self, view: &GraphView, seed: u64) -> AlgoResult<Partition> {
        match self {
            CommunityAlgorithm::FastLouvain => fast_louvain(view),
            CommunityAlgorithm::Louvain => louvain(view, seed),
            CommunityAlgorithm::GreedyModularity => greedy_modularity(view),
        }
    }
}

/// Assignment of every node to one community
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Community label per node index, labels are `0..community_count`
    pub membership: Vec<usize>,
    pub community_count: usize,
}

impl Partition {
    /// Every node in its own community
    pub fn singletons(n: usize) -> Self {
        Partition {
            membership: (0..n).collect(),
            community_count: n,
        }
    }

    /// Relabel arbitrary community ids by first appearance in node order
    fn from_raw(raw: &[usize]) -> Self {
        let (membership, community_count) = relabel(raw);
        Partition {
            membership,
            community_count,
        }
    }

    /// Members of each community, indexed by label
    pub fn communities(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.community_count];
        for (node, &c) in self.membership.iter().enumerate() {
            groups[c].push(node);
        }
        groups
    }
}

fn relabel(raw: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: FxHashMap<usize, usize> = FxHashMap::default();
    let membership = raw
        .iter()
        .map(|c| {
            let next = mapping.len();
            *mapping.entry(*c).or_insert(next)
        })
        .collect();
    (membership, mapping.len())
}

/// Newman modularity of a membership vector on a weighted graph.
///
/// Defined as 0 for a graph without edges.
pub fn modularity(view: &GraphView, membership: &[usize]) -> f64 {
    let m2: f64 = view.weights.iter().sum();
    if m2 == 0.0 {
        return 0.0;
    }

    let mut internal = 0.0;
    let mut tot: FxHashMap<usize, f64> = FxHashMap::default();
    for i in 0..view.node_count {
        let ci = membership[i];
        for (&j, &w) in view.neighbors(i).iter().zip(view.weights(i)) {
            if membership[j] == ci {
                internal += w;
            }
        }
        *tot.entry(ci).or_insert(0.0) += view.weighted_degree(i);
    }

    let expected: f64 = tot.values().map(|t| (t / m2) * (t / m2)).sum();
    internal / m2 - expected
}

/// Weighted graph with self-loops, the working representation across
/// Louvain aggregation levels
struct WorkGraph {
    adj: Vec<Vec<(usize, f64)>>,
    /// Weight of edges collapsed inside a node, each counted once
    loops: Vec<f64>,
    /// Weighted degree, self-loops counted twice
    strength: Vec<f64>,
    /// Sum of strengths (twice the total edge weight)
    total: f64,
}

impl WorkGraph {
    fn new(adj: Vec<Vec<(usize, f64)>>, loops: Vec<f64>) -> Self {
        let strength: Vec<f64> = adj
            .iter()
            .zip(&loops)
            .map(|(row, l)| row.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * l)
            .collect();
        let total = strength.iter().sum();
        WorkGraph {
            adj,
            loops,
            strength,
            total,
        }
    }

    fn from_view(view: &GraphView) -> Self {
        let adj = (0..view.node_count)
            .map(|i| {
                view.neighbors(i)
                    .iter()
                    .copied()
                    .zip(view.weights(i).iter().copied())
                    .collect()
            })
            .collect();
        Self::new(adj, vec![0.0; view.node_count])
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    /// Collapse every community into a single node
    fn aggregate(&self, community: &[usize], count: usize) -> WorkGraph {
        let mut loops = vec![0.0; count];
        let mut links: Vec<FxHashMap<usize, f64>> = vec![FxHashMap::default(); count];

        for i in 0..self.len() {
            let ci = community[i];
            loops[ci] += self.loops[i];
            for &(j, w) in &self.adj[i] {
                let cj = community[j];
                if ci == cj {
                    // Seen once from each endpoint
                    loops[ci] += w / 2.0;
                } else {
                    *links[ci].entry(cj).or_insert(0.0) += w;
                }
            }
        }

        let adj = links
            .into_iter()
            .map(|row| {
                let mut row: Vec<(usize, f64)> = row.into_iter().collect();
                row.sort_unstable_by_key(|&(c, _)| c);
                row
            })
            .collect();
        WorkGraph::new(adj, loops)
    }
}

/// Local moving state for one aggregation level
struct Moving<'g> {
    graph: &'g WorkGraph,
    community: Vec<usize>,
    /// Total strength per community
    tot: Vec<f64>,
    /// Scratch: weight from the current node to each community
    link: Vec<f64>,
    marked: Vec<bool>,
    touched: Vec<usize>,
}

impl<'g> Moving<'g> {
    fn new(graph: &'g WorkGraph) -> Self {
        let n = graph.len();
        Moving {
            graph,
            community: (0..n).collect(),
            tot: graph.strength.clone(),
            link: vec![0.0; n],
            marked: vec![false; n],
            touched: Vec::new(),
        }
    }

    /// Move node `i` to the neighboring community with the best gain.
    /// Returns true when the node changed community.
    fn move_node(&mut self, i: usize) -> bool {
        let g = self.graph;
        let ki = g.strength[i];
        let old = self.community[i];

        for &(j, w) in &g.adj[i] {
            let c = self.community[j];
            if !self.marked[c] {
                self.marked[c] = true;
                self.touched.push(c);
            }
            self.link[c] += w;
        }

        self.tot[old] -= ki;
        let mut best = old;
        let mut best_gain = self.link[old] - self.tot[old] * ki / g.total;
        for &c in &self.touched {
            let gain = self.link[c] - self.tot[c] * ki / g.total;
            if gain > best_gain + MOVE_EPSILON {
                best = c;
                best_gain = gain;
            }
        }
        self.tot[best] += ki;
        self.community[i] = best;

        for &c in &self.touched {
            self.link[c] = 0.0;
            self.marked[c] = false;
        }
        self.touched.clear();

        best != old
    }

    fn quality(&self) -> f64 {
        let g = self.graph;
        let mut internal = 0.0;
        for i in 0..g.len() {
            internal += 2.0 * g.loops[i];
            for &(j, w) in &g.adj[i] {
                if self.community[j] == self.community[i] {
                    internal += w;
                }
            }
        }
        let expected: f64 = self.tot.iter().map(|t| (t / g.total) * (t / g.total)).sum();
        internal / g.total - expected
    }
}

/// Revisit only nodes whose neighborhood changed
fn queue_local_moving(graph: &WorkGraph) -> AlgoResult<(Vec<usize>, bool)> {
    let n = graph.len();
    let mut state = Moving::new(graph);
    let mut queue: VecDeque<usize> = (0..n).collect();
    let mut queued = vec![true; n];
    let mut moved_any = false;
    let max_visits = MAX_VISITS_PER_NODE * n.max(1);
    let mut visits = 0;

    while let Some(i) = queue.pop_front() {
        queued[i] = false;
        visits += 1;
        if visits > max_visits {
            return Err(AlgoError::NotConverged { iterations: visits });
        }
        if state.move_node(i) {
            moved_any = true;
            let ci = state.community[i];
            for &(j, _) in &graph.adj[i] {
                if state.community[j] != ci && !queued[j] {
                    queued[j] = true;
                    queue.push_back(j);
                }
            }
        }
    }

    Ok((state.community, moved_any))
}

/// Full sweeps over all nodes in a shuffled order
fn sweep_local_moving(graph: &WorkGraph, rng: &mut StdRng) -> AlgoResult<(Vec<usize>, bool)> {
    let mut state = Moving::new(graph);
    let mut order: Vec<usize> = (0..graph.len()).collect();
    order.shuffle(rng);

    let mut moved_any = false;
    let mut current = state.quality();
    for _ in 0..MAX_SWEEPS {
        let mut moved = false;
        for &i in &order {
            moved |= state.move_node(i);
        }
        if !moved {
            return Ok((state.community, moved_any));
        }
        moved_any = true;

        let q = state.quality();
        if q - current < MIN_SWEEP_GAIN {
            return Ok((state.community, moved_any));
        }
        current = q;
    }

    Err(AlgoError::NotConverged {
        iterations: MAX_SWEEPS,
    })
}

fn multilevel<F>(view: &GraphView, mut local_moving: F) -> AlgoResult<Partition>
where
    F: FnMut(&WorkGraph) -> AlgoResult<(Vec<usize>, bool)>,
{
    if view.edge_count() == 0 {
        return Err(AlgoError::DegenerateGraph(
            "modularity is undefined without edges".to_string(),
        ));
    }

    let mut graph = WorkGraph::from_view(view);
    // Original node -> node of the current level
    let mut membership: Vec<usize> = (0..view.node_count).collect();
    let mut level = 0;

    loop {
        let (community, moved) = local_moving(&graph)?;
        if !moved {
            break;
        }
        let (labels, count) = relabel(&community);
        for m in membership.iter_mut() {
            *m = labels[*m];
        }
        level += 1;
        debug!(level, communities = count, "louvain level complete");
        if count == graph.len() {
            break;
        }
        graph = graph.aggregate(&labels, count);
    }

    let partition = Partition::from_raw(&membership);
    let q = modularity(view, &partition.membership);
    if !q.is_finite() {
        return Err(AlgoError::NumericalFailure(format!("modularity is {q}")));
    }
    Ok(partition)
}

/// Louvain with queue-driven local moving; deterministic node order
pub fn fast_louvain(view: &GraphView) -> AlgoResult<Partition> {
    multilevel(view, queue_local_moving)
}

/// Classic Louvain; node visiting order is shuffled with `StdRng::seed_from_u64(seed)`
pub fn louvain(view: &GraphView, seed: u64) -> AlgoResult<Partition> {
    let mut rng = StdRng::seed_from_u64(seed);
    multilevel(view, |graph| sweep_local_moving(graph, &mut rng))
}

/// Clauset-Newman-Moore greedy agglomeration.
///
/// Labels are ordered by community size (largest first), ties by the lowest
/// member index. A graph without edges yields singletons.
pub fn greedy_modularity(view: &GraphView) -> AlgoResult<Partition> {
    let n = view.node_count;
    let m2: f64 = view.weights.iter().sum();
    if view.edge_count() == 0 || m2 == 0.0 {
        return Ok(Partition::singletons(n));
    }
    if !m2.is_finite() {
        return Err(AlgoError::NumericalFailure("total edge weight is not finite".to_string()));
    }

    // a[i]: fraction of edge ends in community i; e[i][j]: fraction of edge
    // ends from i to j
    let mut a: Vec<f64> = (0..n).map(|i| view.weighted_degree(i) / m2).collect();
    let mut e: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
    for (u, v, w) in view.edges() {
        *e[u].entry(v).or_insert(0.0) += w / m2;
        *e[v].entry(u).or_insert(0.0) += w / m2;
    }
    let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    let mut alive = vec![true; n];

    loop {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in (0..n).filter(|&i| alive[i]) {
            for (&j, &eij) in e[i].range(i + 1..) {
                let dq = 2.0 * (eij - a[i] * a[j]);
                if best.map_or(true, |(_, _, b)| dq > b) {
                    best = Some((i, j, dq));
                }
            }
        }

        let (i, j) = match best {
            Some((i, j, dq)) if dq > MOVE_EPSILON => (i, j),
            _ => break,
        };

        // Merge j into i
        let row = std::mem::take(&mut e[j]);
        for (k, ejk) in row {
            if k == i {
                continue;
            }
            e[k].remove(&j);
            *e[k].entry(i).or_insert(0.0) += ejk;
            *e[i].entry(k).or_insert(0.0) += ejk;
        }
        e[i].remove(&j);
        a[i] += a[j];
        alive[j] = false;
        let moved = std::mem::take(&mut members[j]);
        members[i].extend(moved);
    }

    let mut groups: Vec<Vec<usize>> = members.into_iter().filter(|m| !m.is_empty()).collect();
    for g in groups.iter_mut() {
        g.sort_unstable();
    }
    groups.sort_by(|x, y| y.len().cmp(&x.len()).then_with(|| x[0].cmp(&y[0])));

    let mut membership = vec![0; n];
    for (label, group) in groups.iter().enumerate() {
        for &node in group {
            membership[node] = label;
        }
    }
    Ok(Partition {
        membership,
        community_count: groups.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> GraphView {
        GraphView::from_unweighted(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)])
    }

    fn barbell() -> GraphView {
        // Two 4-cliques joined by the bridge 3-4
        let mut edges = Vec::new();
        for base in [0, 4] {
            for i in 0..4 {
                for j in (i + 1)..4 {
                    edges.push((base + i, base + j));
                }
            }
        }
        edges.push((3, 4));
        GraphView::from_unweighted(8, &edges)
    }

    fn assert_split(p: &Partition, left: &[usize], right: &[usize]) {
        assert_eq!(p.community_count, 2);
        assert!(left.iter().all(|&i| p.membership[i] == p.membership[left[0]]));
        assert!(right.iter().all(|&i| p.membership[i] == p.membership[right[0]]));
        assert_ne!(p.membership[left[0]], p.membership[right[0]]);
    }

    #[test]
    fn test_two_triangles_every_algorithm() {
        let view = two_triangles();
        for algo in CommunityAlgorithm::ALL {
            let p = algo.detect(&view, 42).unwrap();
            assert_split(&p, &[0, 1, 2], &[3, 4, 5]);
        }
    }

    #[test]
    fn test_barbell_every_algorithm() {
        let view = barbell();
        for algo in CommunityAlgorithm::ALL {
            let p = algo.detect(&view, 7).unwrap();
            assert_split(&p, &[0, 1, 2, 3], &[4, 5, 6, 7]);
        }
    }

    #[test]
    fn test_louvain_labels_follow_first_appearance() {
        let p = fast_louvain(&two_triangles()).unwrap();
        assert_eq!(p.membership, vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_edgeless_graph() {
        let view = GraphView::from_edges(4, &[]);
        assert!(matches!(fast_louvain(&view), Err(AlgoError::DegenerateGraph(_))));
        assert!(matches!(louvain(&view, 1), Err(AlgoError::DegenerateGraph(_))));

        let p = greedy_modularity(&view).unwrap();
        assert_eq!(p.community_count, 4);
        assert_eq!(p.membership, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_greedy_labels_largest_first() {
        // Triangle 3-4-5 plus the single edge 0-1, node 2 isolated
        let view = GraphView::from_unweighted(6, &[(0, 1), (3, 4), (4, 5), (5, 3)]);
        let p = greedy_modularity(&view).unwrap();

        assert_eq!(p.membership[3], 0);
        assert_eq!(p.membership[0], 1);
        assert_eq!(p.membership[1], 1);
        assert_eq!(p.membership[2], 2);
        assert_eq!(p.community_count, 3);
    }

    #[test]
    fn test_louvain_is_reproducible_for_a_seed() {
        let view = barbell();
        assert_eq!(louvain(&view, 99).unwrap(), louvain(&view, 99).unwrap());
    }

    #[test]
    fn test_modularity_values() {
        let view = two_triangles();
        let q = modularity(&view, &[0, 0, 0, 1, 1, 1]);
        assert!((q - 0.5).abs() < 1e-12);

        let single = modularity(&view, &[0; 6]);
        assert!(single.abs() < 1e-12);

        let empty = GraphView::from_edges(3, &[]);
        assert_eq!(modularity(&empty, &[0, 1, 2]), 0.0);
    }

    #[test]
    fn test_partition_communities() {
        let p = Partition {
            membership: vec![1, 0, 1],
            community_count: 2,
        };
        assert_eq!(p.communities(), vec![vec![1], vec![0, 2]]);
        assert_eq!(Partition::singletons(2).communities(), vec![vec![0], vec![1]]);
    }
}
