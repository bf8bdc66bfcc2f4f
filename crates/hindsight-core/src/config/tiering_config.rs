use serde::{Deserialize, Serialize};

use super::defaults;

/// Memory tier mapper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TieringConfig {
    /// Aggregate frustration at which a promoted pattern becomes an anchor.
    pub anchor_threshold: f64,
    /// Persist unclustered corrections and one-off approvals as session-scoped records.
    pub capture_single_session: bool,
    /// Tool names whose approval is recorded as a decision (e.g. plan approval).
    pub decision_tools: Vec<String>,
}

impl Default for TieringConfig {
    fn default() -> Self {
        Self {
            anchor_threshold: defaults::DEFAULT_ANCHOR_THRESHOLD,
            capture_single_session: defaults::DEFAULT_CAPTURE_SINGLE_SESSION,
            decision_tools: defaults::DEFAULT_DECISION_TOOLS
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}
