//! Betweenness centrality
//!
//! Brandes dependency accumulation, either from every node (exact) or from a
//! seeded sample of source nodes (estimate scaled by `n / k`).

use super::common::GraphView;
use super::pathfinding::{shortest_path_dag, PathMetric};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Betweenness configuration
#[derive(Debug, Clone, Copy)]
pub struct BetweennessConfig {
    /// How path length is measured
    pub path_metric: PathMetric,
    /// Divide by the number of pairs not involving the node, `(n-1)(n-2)/2`
    pub normalized: bool,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            path_metric: PathMetric::Weighted,
            normalized: true,
        }
    }
}

/// Default number of sampled sources for a graph of `n` nodes:
/// `10 * sqrt(n)` kept within `[50, 500]`, never more than `n`.
pub fn default_sample_size(n: usize) -> usize {
    let k = ((n as f64).sqrt() * 10.0).round() as usize;
    k.clamp(50, 500).min(n)
}

/// Largest value betweenness can take on a graph of `n` nodes
pub fn theoretical_max(n: usize, normalized: bool) -> f64 {
    if n <= 2 {
        return 0.0;
    }
    if normalized {
        1.0
    } else {
        ((n - 1) * (n - 2)) as f64 / 2.0
    }
}

/// Exact betweenness using every node as a source
pub fn betweenness_exact(view: &GraphView, config: &BetweennessConfig) -> Vec<f64> {
    let n = view.node_count;
    if n <= 1 {
        return vec![0.0; n];
    }
    let sources: Vec<usize> = (0..n).collect();
    let mut scores = accumulate(view, &sources, config.path_metric);
    rescale(&mut scores, n, None, config.normalized);
    scores
}

/// Estimated betweenness from `k` distinct sources drawn with a seeded RNG.
///
/// The same `(view, k, seed)` always selects the same sources. When `k >= n`
/// every node is a source and the result equals [`betweenness_exact`].
/// Estimates are clamped into `[0, theoretical_max]`.
pub fn betweenness_sampled(
    view: &GraphView,
    config: &BetweennessConfig,
    k: usize,
    seed: u64,
) -> Vec<f64> {
    let n = view.node_count;
    if n <= 1 {
        return vec![0.0; n];
    }
    let k = k.clamp(1, n);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut sources = rand::seq::index::sample(&mut rng, n, k).into_vec();
    sources.sort_unstable();
    debug!(nodes = n, sources = k, seed, "sampled betweenness sources");

    let mut scores = accumulate(view, &sources, config.path_metric);
    rescale(&mut scores, n, Some(k), config.normalized);

    let max = theoretical_max(n, config.normalized);
    for s in scores.iter_mut() {
        *s = s.clamp(0.0, max);
    }
    scores
}

/// Dependencies of every node on paths rooted at `source`
fn single_source_dependencies(view: &GraphView, source: usize, metric: PathMetric) -> Vec<f64> {
    let dag = shortest_path_dag(view, source, metric);
    let mut delta = vec![0.0; view.node_count];

    for &w in dag.order.iter().rev() {
        let coeff = (1.0 + delta[w]) / dag.sigma[w];
        for &v in &dag.predecessors[w] {
            delta[v] += dag.sigma[v] * coeff;
        }
    }
    delta[source] = 0.0;
    delta
}

#[cfg(not(feature = "parallel"))]
fn accumulate(view: &GraphView, sources: &[usize], metric: PathMetric) -> Vec<f64> {
    let mut scores = vec![0.0; view.node_count];
    for &s in sources {
        let delta = single_source_dependencies(view, s, metric);
        for (score, d) in scores.iter_mut().zip(delta) {
            *score += d;
        }
    }
    scores
}

// Partial results are summed in source order, so the output is bit-identical
// to the sequential build.
#[cfg(feature = "parallel")]
fn accumulate(view: &GraphView, sources: &[usize], metric: PathMetric) -> Vec<f64> {
    let partials: Vec<Vec<f64>> = sources
        .par_iter()
        .map(|&s| single_source_dependencies(view, s, metric))
        .collect();

    let mut scores = vec![0.0; view.node_count];
    for delta in partials {
        for (score, d) in scores.iter_mut().zip(delta) {
            *score += d;
        }
    }
    scores
}

fn rescale(scores: &mut [f64], n: usize, k: Option<usize>, normalized: bool) {
    let scale = if normalized {
        if n <= 2 {
            None
        } else {
            Some(1.0 / ((n - 1) * (n - 2)) as f64)
        }
    } else {
        // Undirected: each pair was counted from both endpoints
        Some(0.5)
    };

    if let Some(mut scale) = scale {
        if let Some(k) = k {
            scale *= n as f64 / k as f64;
        }
        for s in scores.iter_mut() {
            *s *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path5() -> GraphView {
        GraphView::from_unweighted(5, &[(0, 1), (1, 2), (2, 3), (3, 4)])
    }

    #[test]
    fn test_exact_path_graph() {
        let scores = betweenness_exact(&path5(), &BetweennessConfig::default());

        // Center lies on 4 of the 6 pairs that exclude it
        assert!((scores[2] - 4.0 / 6.0).abs() < 1e-12);
        assert!((scores[1] - 3.0 / 6.0).abs() < 1e-12);
        assert_eq!(scores[0], 0.0);
        assert_eq!(scores[4], 0.0);
    }

    #[test]
    fn test_unnormalized_counts_pairs() {
        let config = BetweennessConfig {
            path_metric: PathMetric::Hops,
            normalized: false,
        };
        let scores = betweenness_exact(&path5(), &config);
        assert!((scores[2] - 4.0).abs() < 1e-12);
        assert!((scores[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_are_path_lengths() {
        // Square 0-1-2-3-0 where the 0-3 edge is heavy: the path 0..3 goes around
        let view = GraphView::from_edges(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 10.0)]);
        let weighted = betweenness_exact(&view, &BetweennessConfig::default());
        let hops = betweenness_exact(
            &view,
            &BetweennessConfig {
                path_metric: PathMetric::Hops,
                normalized: true,
            },
        );

        assert!(weighted[1] > hops[1]);
        assert!(weighted[2] > hops[2]);
    }

    #[test]
    fn test_full_sample_equals_exact() {
        let view = path5();
        let config = BetweennessConfig::default();
        assert_eq!(
            betweenness_sampled(&view, &config, 5, 42),
            betweenness_exact(&view, &config)
        );
    }

    #[test]
    fn test_sampled_is_bounded_and_ranked() {
        let view = path5();
        let config = BetweennessConfig::default();
        for seed in 0..20 {
            let scores = betweenness_sampled(&view, &config, 3, seed);
            assert!(scores.iter().all(|&s| (0.0..=1.0).contains(&s)));
            assert_eq!(scores[0], 0.0);
            assert_eq!(scores[4], 0.0);
            assert!(scores[2] > scores[0]);
        }
    }

    #[test]
    fn test_sampled_star_is_clamped() {
        // Star center would be over-estimated when the center is not sampled
        let view = GraphView::from_unweighted(6, &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
        for seed in 0..10 {
            let scores = betweenness_sampled(&view, &BetweennessConfig::default(), 2, seed);
            assert!(scores[0] <= 1.0);
        }
    }

    #[test]
    fn test_sampling_is_reproducible() {
        let view = GraphView::from_unweighted(
            8,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7), (1, 6)],
        );
        let config = BetweennessConfig::default();
        assert_eq!(
            betweenness_sampled(&view, &config, 3, 7),
            betweenness_sampled(&view, &config, 3, 7)
        );
    }

    #[test]
    fn test_default_sample_size() {
        assert_eq!(default_sample_size(10), 10);
        assert_eq!(default_sample_size(100), 100);
        assert_eq!(default_sample_size(2500), 500);
        assert_eq!(default_sample_size(10_000), 500);
        assert_eq!(default_sample_size(400), 200);
    }

    #[test]
    fn test_tiny_graphs_are_zero() {
        let view = GraphView::from_unweighted(2, &[(0, 1)]);
        assert_eq!(betweenness_exact(&view, &BetweennessConfig::default()), vec![0.0, 0.0]);
        let empty = GraphView::from_edges(0, &[]);
        assert!(betweenness_exact(&empty, &BetweennessConfig::default()).is_empty());
    }
}
