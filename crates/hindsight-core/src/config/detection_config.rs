use serde::{Deserialize, Serialize};

use super::defaults;

/// Correction/approval detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// How many MAIN ancestors to walk back when collecting assistant context.
    pub lookback_window: usize,
    /// Approval phrasing only counts when the turn has at most this many tokens.
    pub approval_max_tokens: usize,
    /// Added to the base weight for each earlier similar correction in the same session.
    pub escalation_bonus: f64,
    /// Cap on how many earlier similar corrections contribute a bonus.
    pub max_escalation_steps: usize,
    /// Token-overlap similarity at which two corrections in one session count as a repeat.
    pub repeat_similarity_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            lookback_window: defaults::DEFAULT_LOOKBACK_WINDOW,
            approval_max_tokens: defaults::DEFAULT_APPROVAL_MAX_TOKENS,
            escalation_bonus: defaults::DEFAULT_ESCALATION_BONUS,
            max_escalation_steps: defaults::DEFAULT_MAX_ESCALATION_STEPS,
            repeat_similarity_threshold: defaults::DEFAULT_REPEAT_SIMILARITY_THRESHOLD,
        }
    }
}
