//! Metrics engine
//!
//! Computes degree, degree centrality, betweenness, eigenvector centrality and
//! community membership for every node, with strategies chosen by graph size:
//!
//! - betweenness: exact when requested and the graph has at most
//!   `max_nodes_for_exact` nodes, otherwise estimated from seeded samples
//! - eigenvector: sparse solver, then dense solver, then 0 for every node
//! - communities: the configured tiers in order, then singletons
//!
//! Only configuration errors are returned. Numerical failures are absorbed by
//! the fallback chains and recorded in [`MetricsProvenance`].

pub mod config;
pub mod tables;

pub use config::{MetricsConfig, DEFAULT_SEED};
pub use tables::{BetweennessMode, EdgeMetricsRow, MetricsProvenance, MetricsTables, NodeMetricsRow};

use crate::error::CographResult;
use crate::graph::CooccurrenceGraph;
use cograph_algorithms::{
    betweenness_exact, betweenness_sampled, default_sample_size, degree_stats, modularity,
    run_chain, BetweennessConfig, CommunityStrategy, EigenvectorSolver, EigenvectorStrategy,
    GraphView, Partition, Strategy,
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Provenance name when every eigenvector solver failed
pub const NEUTRAL_EIGENVECTOR: &str = "neutral_default";
/// Provenance name when every community tier failed
pub const SINGLETON_COMMUNITIES: &str = "singletons";

/// Choose how betweenness is computed for a graph of `n` nodes
pub fn betweenness_mode(n: usize, config: &MetricsConfig) -> BetweennessMode {
    if n <= 1 {
        return BetweennessMode::Trivial;
    }
    if !config.approx_betweenness && n <= config.max_nodes_for_exact {
        return BetweennessMode::Exact;
    }
    let k = config
        .betweenness_sample_k
        .unwrap_or_else(|| default_sample_size(n))
        .min(n);
    BetweennessMode::Sampled {
        k,
        seed: config.seed,
    }
}

fn compute_betweenness(view: &GraphView, mode: BetweennessMode, config: &MetricsConfig) -> Vec<f64> {
    let algo_config = BetweennessConfig {
        path_metric: config.path_metric,
        normalized: true,
    };
    match mode {
        BetweennessMode::Trivial => vec![0.0; view.node_count],
        BetweennessMode::Exact => betweenness_exact(view, &algo_config),
        BetweennessMode::Sampled { k, seed } => betweenness_sampled(view, &algo_config, k, seed),
    }
}

fn compute_eigenvector(view: &GraphView, config: &MetricsConfig) -> (Vec<f64>, String) {
    let sparse = EigenvectorStrategy {
        solver: EigenvectorSolver::Sparse,
        config: config.eigenvector,
    };
    let dense = EigenvectorStrategy {
        solver: EigenvectorSolver::Dense,
        config: config.eigenvector,
    };
    let chain: [&dyn Strategy<Vec<f64>>; 2] = [&sparse, &dense];

    match run_chain(view, &chain) {
        Ok(outcome) => (outcome.value, outcome.strategy.to_string()),
        Err(failures) => {
            if view.edge_count() > 0 {
                warn!(
                    attempts = failures.len(),
                    "every eigenvector solver failed, using 0 for all nodes"
                );
            } else {
                debug!("graph has no edges, eigenvector centrality is 0 for all nodes");
            }
            (vec![0.0; view.node_count], NEUTRAL_EIGENVECTOR.to_string())
        }
    }
}

fn detect_communities(view: &GraphView, config: &MetricsConfig) -> (Partition, String) {
    let strategies: Vec<CommunityStrategy> = config
        .community_tiers
        .iter()
        .map(|&algorithm| CommunityStrategy {
            algorithm,
            seed: config.seed,
        })
        .collect();
    let chain: Vec<&dyn Strategy<Partition>> =
        strategies.iter().map(|s| s as &dyn Strategy<Partition>).collect();

    match run_chain(view, &chain) {
        Ok(outcome) => (outcome.value, outcome.strategy.to_string()),
        Err(failures) => {
            warn!(
                attempts = failures.len(),
                "no community algorithm succeeded, every node is its own community"
            );
            (
                Partition::singletons(view.node_count),
                SINGLETON_COMMUNITIES.to_string(),
            )
        }
    }
}

fn defined(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Compute the node and edge tables for `graph`.
///
/// The graph is only read. With a fixed `config.seed` the result is identical
/// across calls. An empty graph yields empty tables.
pub fn compute(graph: &CooccurrenceGraph, config: &MetricsConfig) -> CographResult<MetricsTables> {
    config.validate()?;
    let started = Instant::now();
    let view = graph.to_view();
    let n = view.node_count;

    let degrees = degree_stats(&view);
    let weighted_degrees = graph.weighted_degrees();

    let mode = betweenness_mode(n, config);
    debug!(nodes = n, ?mode, "computing betweenness");
    let betweenness = compute_betweenness(&view, mode, config);

    let (eigenvector, eigenvector_strategy) = compute_eigenvector(&view, config);
    let (partition, community_strategy) = detect_communities(&view, config);
    let q = defined(modularity(&view, &partition.membership));

    let mut nodes: Vec<NodeMetricsRow> = graph
        .nodes()
        .enumerate()
        .map(|(i, id)| NodeMetricsRow {
            node_id: id.clone(),
            label: id.value().to_string(),
            source_field: id.field().to_string(),
            degree: degrees.degree[i],
            degree_weighted: weighted_degrees[i],
            degree_centrality: defined(degrees.centrality[i]),
            betweenness: defined(betweenness[i]),
            eigenvector: defined(eigenvector[i]),
            community: partition.membership[i],
        })
        .collect();
    nodes.sort_by(|a, b| {
        b.degree_weighted
            .cmp(&a.degree_weighted)
            .then_with(|| a.node_id.cmp(&b.node_id))
    });

    let mut edges: Vec<EdgeMetricsRow> = graph
        .edges()
        .map(|e| EdgeMetricsRow {
            u: e.u.clone(),
            v: e.v.clone(),
            weight: e.weight,
        })
        .collect();
    edges.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then_with(|| a.u.cmp(&b.u))
            .then_with(|| a.v.cmp(&b.v))
    });

    info!(
        nodes = n,
        edges = edges.len(),
        communities = partition.community_count,
        eigenvector = %eigenvector_strategy,
        community = %community_strategy,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "computed graph metrics"
    );

    Ok(MetricsTables {
        nodes,
        edges,
        modularity: q,
        provenance: MetricsProvenance {
            betweenness: mode,
            eigenvector: eigenvector_strategy,
            community: community_strategy,
        },
    })
}
