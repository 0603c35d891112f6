//! Degree-based centrality

use super::common::GraphView;

/// Per-node degree statistics, indexed like the view
#[derive(Debug, Clone, Default)]
pub struct DegreeStats {
    /// Unweighted neighbor count
    pub degree: Vec<usize>,
    /// Sum of incident edge weights
    pub weighted: Vec<f64>,
    /// `degree / (n - 1)`, or 0 when the graph has a single node
    pub centrality: Vec<f64>,
}

/// Compute degree, weighted degree and degree centrality in O(nodes + edges)
pub fn degree_stats(view: &GraphView) -> DegreeStats {
    let n = view.node_count;
    let degree: Vec<usize> = (0..n).map(|i| view.degree(i)).collect();
    let weighted: Vec<f64> = (0..n).map(|i| view.weighted_degree(i)).collect();

    let centrality = if n > 1 {
        let denom = (n - 1) as f64;
        degree.iter().map(|&d| d as f64 / denom).collect()
    } else {
        vec![0.0; n]
    };

    DegreeStats {
        degree,
        weighted,
        centrality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_degrees() {
        // Center 0 connected to 1, 2, 3 with weights 1, 2, 3
        let view = GraphView::from_edges(4, &[(0, 1, 1.0), (0, 2, 2.0), (0, 3, 3.0)]);
        let stats = degree_stats(&view);

        assert_eq!(stats.degree, vec![3, 1, 1, 1]);
        assert_eq!(stats.weighted, vec![6.0, 1.0, 2.0, 3.0]);
        assert_eq!(stats.centrality[0], 1.0);
        assert!((stats.centrality[1] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_node_has_zero_centrality() {
        let view = GraphView::from_edges(1, &[]);
        let stats = degree_stats(&view);
        assert_eq!(stats.centrality, vec![0.0]);
        assert_eq!(stats.degree, vec![0]);
    }
}
