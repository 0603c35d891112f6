//! Property-based tests for graph construction and metrics
//!
//! Datasets are small random tables over a tiny value alphabet so that
//! values repeat often and rows share nodes.

use cograph::{build_graph, compute_metrics, BuildOptions, Dataset, MetricsConfig, NodeIdentity};
use proptest::prelude::*;
use std::collections::HashSet;

const COLUMNS: [&str; 3] = ["A", "B", "C"];

fn cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some(String::new())),
        6 => "[a-d]".prop_map(Some),
    ]
}

fn arb_rows() -> impl Strategy<Value = Vec<Vec<Option<String>>>> {
    prop::collection::vec(prop::collection::vec(cell(), COLUMNS.len()), 0..30)
}

fn arb_fields() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(COLUMNS.to_vec(), 1..=COLUMNS.len())
}

fn dataset(rows: &[Vec<Option<String>>]) -> Dataset {
    let mut dataset = Dataset::new(COLUMNS);
    for row in rows {
        dataset.push_row(row.clone()).unwrap();
    }
    dataset
}

fn present<'r>(row: &'r [Option<String>], fields: &[&str]) -> Vec<(&'static str, &'r str)> {
    COLUMNS
        .iter()
        .enumerate()
        .filter(|(_, name)| fields.contains(*name))
        .filter_map(|(col, name)| match row[col].as_deref() {
            Some(v) if !v.is_empty() => Some((*name, v)),
            _ => None,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// One node per distinct populated (field, value) pair
    #[test]
    fn prop_nodes_are_distinct_field_values(rows in arb_rows(), fields in arb_fields()) {
        let graph = build_graph(&dataset(&rows), &fields, &BuildOptions::default()).unwrap();

        let expected: HashSet<(&str, &str)> =
            rows.iter().flat_map(|row| present(row, &fields)).collect();
        prop_assert_eq!(graph.node_count(), expected.len());
        for (field, value) in expected {
            prop_assert!(graph.contains_node(&NodeIdentity::new(field, value)));
        }
    }

    /// Total edge weight is the number of co-occurring pairs over all rows
    #[test]
    fn prop_total_weight_counts_pairs(rows in arb_rows(), fields in arb_fields()) {
        let graph = build_graph(&dataset(&rows), &fields, &BuildOptions::default()).unwrap();

        let pairs: u64 = rows
            .iter()
            .map(|row| {
                let k = present(row, &fields).len() as u64;
                k * k.saturating_sub(1) / 2
            })
            .sum();
        prop_assert_eq!(graph.total_weight(), pairs);
    }

    /// Weighted degree is the sum of incident edge weights
    #[test]
    fn prop_weighted_degree_sums_incident_edges(rows in arb_rows(), fields in arb_fields()) {
        let graph = build_graph(&dataset(&rows), &fields, &BuildOptions::default()).unwrap();

        for node in graph.nodes() {
            let incident: u64 = graph
                .edges()
                .filter(|e| e.u == node || e.v == node)
                .map(|e| e.weight)
                .sum();
            prop_assert_eq!(graph.weighted_degree(node), Some(incident));
        }
        let degree_sum: u64 = graph.nodes().filter_map(|n| graph.weighted_degree(n)).sum();
        prop_assert_eq!(degree_sum, 2 * graph.total_weight());
    }

    /// Raising the threshold never adds nodes or edges, and leaves no isolates
    #[test]
    fn prop_pruning_is_monotonic(rows in arb_rows(), fields in arb_fields(), m in 1u64..5) {
        let data = dataset(&rows);
        let loose = build_graph(&data, &fields, &BuildOptions::with_min_weight(m)).unwrap();
        let strict = build_graph(&data, &fields, &BuildOptions::with_min_weight(m + 1)).unwrap();

        prop_assert!(strict.node_count() <= loose.node_count());
        prop_assert!(strict.edge_count() <= loose.edge_count());
        for edge in strict.edges() {
            prop_assert!(edge.weight > m);
            prop_assert_eq!(loose.edge_weight(edge.u, edge.v), Some(edge.weight));
        }
        for node in strict.nodes() {
            prop_assert!(strict.weighted_degree(node).unwrap_or(0) > 0);
        }
    }

    /// Every metric is defined and within its range, and communities partition the nodes
    #[test]
    fn prop_metrics_are_defined(rows in arb_rows(), fields in arb_fields(), exact in any::<bool>()) {
        let graph = build_graph(&dataset(&rows), &fields, &BuildOptions::default()).unwrap();
        let config = if exact { MetricsConfig::exact() } else { MetricsConfig::default() };
        let tables = compute_metrics(&graph, &config).unwrap();

        prop_assert_eq!(tables.nodes.len(), graph.node_count());
        prop_assert_eq!(tables.edges.len(), graph.edge_count());

        let communities = tables.community_count();
        let mut seen = HashSet::new();
        for row in &tables.nodes {
            prop_assert!(seen.insert(row.node_id.clone()));
            prop_assert_eq!(Some(row.degree_weighted), graph.weighted_degree(&row.node_id));
            prop_assert!((0.0..=1.0).contains(&row.degree_centrality));
            prop_assert!((0.0..=1.0 + 1e-9).contains(&row.betweenness));
            prop_assert!(row.eigenvector.is_finite() && row.eigenvector >= 0.0);
            prop_assert!(row.community < communities);
        }
        for pair in tables.nodes.windows(2) {
            prop_assert!(pair[0].degree_weighted >= pair[1].degree_weighted);
        }
    }
}
