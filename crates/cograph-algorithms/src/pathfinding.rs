//! Single-source shortest path DAGs
//!
//! BFS (hop count) and Dijkstra (weight as length) variants that record every
//! shortest-path predecessor and the number of shortest paths per node, which
//! is what dependency accumulation in betweenness needs.

use super::common::GraphView;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the length of a path is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PathMetric {
    /// Every edge has length 1
    Hops,
    /// Edge weight is the edge length
    #[default]
    Weighted,
}

/// Shortest paths from one source to every reachable node
#[derive(Debug, Clone)]
pub struct ShortestPathDag {
    pub source: usize,
    /// Reached nodes in non-decreasing order of distance (source first)
    pub order: Vec<usize>,
    /// Predecessors of each node on some shortest path
    pub predecessors: Vec<Vec<usize>>,
    /// Number of distinct shortest paths from the source
    pub sigma: Vec<f64>,
    /// Distance from the source, `f64::INFINITY` when unreachable
    pub distance: Vec<f64>,
}

/// Build the shortest-path DAG rooted at `source`
pub fn shortest_path_dag(view: &GraphView, source: usize, metric: PathMetric) -> ShortestPathDag {
    match metric {
        PathMetric::Hops => bfs_dag(view, source),
        PathMetric::Weighted => dijkstra_dag(view, source),
    }
}

fn empty_dag(n: usize, source: usize) -> ShortestPathDag {
    let mut dag = ShortestPathDag {
        source,
        order: Vec::with_capacity(n),
        predecessors: vec![Vec::new(); n],
        sigma: vec![0.0; n],
        distance: vec![f64::INFINITY; n],
    };
    dag.sigma[source] = 1.0;
    dag.distance[source] = 0.0;
    dag
}

fn bfs_dag(view: &GraphView, source: usize) -> ShortestPathDag {
    let mut dag = empty_dag(view.node_count, source);
    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        dag.order.push(v);
        let next_dist = dag.distance[v] + 1.0;
        for &w in view.neighbors(v) {
            if dag.distance[w].is_infinite() {
                dag.distance[w] = next_dist;
                queue.push_back(w);
            }
            if dag.distance[w] == next_dist {
                dag.sigma[w] += dag.sigma[v];
                dag.predecessors[w].push(v);
            }
        }
    }

    dag
}

/// State for Dijkstra priority queue
#[derive(Copy, Clone, Debug)]
struct State {
    cost: f64,
    node_idx: usize,
    pred: usize,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node_idx.cmp(&self.node_idx))
            .then_with(|| other.pred.cmp(&self.pred))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra_dag(view: &GraphView, source: usize) -> ShortestPathDag {
    let n = view.node_count;
    let mut dag = empty_dag(n, source);
    let mut settled = vec![false; n];
    // Best tentative distance seen so far
    let mut seen = vec![f64::INFINITY; n];
    seen[source] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node_idx: source, pred: source });

    while let Some(State { cost, node_idx: v, pred }) = heap.pop() {
        if settled[v] {
            continue;
        }
        if v != source {
            dag.sigma[v] += dag.sigma[pred];
        }
        settled[v] = true;
        dag.distance[v] = cost;
        dag.order.push(v);

        for (&w, &weight) in view.neighbors(v).iter().zip(view.weights(v)) {
            if settled[w] || weight < 0.0 {
                continue;
            }
            let next_cost = cost + weight;
            if next_cost < seen[w] {
                seen[w] = next_cost;
                heap.push(State { cost: next_cost, node_idx: w, pred: v });
                dag.sigma[w] = 0.0;
                dag.predecessors[w].clear();
                dag.predecessors[w].push(v);
            } else if next_cost == seen[w] {
                dag.sigma[w] += dag.sigma[v];
                dag.predecessors[w].push(v);
            }
        }
    }

    dag
}
