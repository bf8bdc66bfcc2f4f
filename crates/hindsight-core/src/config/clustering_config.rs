use serde::{Deserialize, Serialize};

use super::defaults;

/// Cross-session cluster builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Minimum token-overlap similarity for an event to join an existing cluster.
    pub similarity_threshold: f64,
    /// Member count at which a cluster is promoted to a pattern.
    pub repetition_threshold: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            repetition_threshold: defaults::DEFAULT_REPETITION_THRESHOLD,
        }
    }
}
