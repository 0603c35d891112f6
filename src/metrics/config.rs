//! Metrics engine configuration
//!
//! Every knob is passed explicitly to [`crate::metrics::compute`]; nothing is
//! read from global state, so two computations with the same graph and the
//! same config produce the same tables.

use crate::error::{CographError, CographResult};
use cograph_algorithms::{CommunityAlgorithm, EigenvectorConfig, PathMetric};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Seed used for betweenness sampling and Louvain node order unless overridden
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Estimate betweenness from sampled sources instead of computing it exactly
    pub approx_betweenness: bool,
    /// Number of sampled sources; `None` picks `10 * sqrt(n)` within `[50, 500]`
    pub betweenness_sample_k: Option<usize>,
    /// Above this node count betweenness is always estimated
    pub max_nodes_for_exact: usize,
    /// Seed for every randomized step
    pub seed: u64,
    /// Whether shortest paths count hops or sum edge weights
    pub path_metric: PathMetric,
    pub eigenvector: EigenvectorConfig,
    /// Community algorithms in the order they are tried
    pub community_tiers: Vec<CommunityAlgorithm>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            approx_betweenness: true,
            betweenness_sample_k: None,
            max_nodes_for_exact: 2000,
            seed: DEFAULT_SEED,
            path_metric: PathMetric::Weighted,
            eigenvector: EigenvectorConfig::default(),
            community_tiers: CommunityAlgorithm::ALL.to_vec(),
        }
    }
}

impl MetricsConfig {
    /// Exact betweenness whenever the graph is small enough
    pub fn exact() -> Self {
        Self {
            approx_betweenness: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> CographResult<()> {
        if self.max_nodes_for_exact == 0 {
            return Err(CographError::InvalidConfig(
                "max_nodes_for_exact must be greater than 0".to_string(),
            ));
        }
        if self.betweenness_sample_k == Some(0) {
            return Err(CographError::InvalidConfig(
                "betweenness_sample_k must be greater than 0".to_string(),
            ));
        }
        if self.eigenvector.max_iter == 0 {
            return Err(CographError::InvalidConfig(
                "eigenvector.max_iter must be greater than 0".to_string(),
            ));
        }
        let tol = self.eigenvector.tolerance;
        if !tol.is_finite() || tol <= 0.0 {
            return Err(CographError::InvalidConfig(format!(
                "eigenvector.tolerance must be a positive number, got {tol}"
            )));
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> CographResult<Self> {
        let config: MetricsConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> CographResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}
