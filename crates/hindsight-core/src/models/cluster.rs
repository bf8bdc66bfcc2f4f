use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CorrectionCategory;

/// A group of similar corrections, promoted once it reaches the repetition threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCluster {
    /// Derived from the seed event id; stable across runs.
    pub id: String,
    /// Text of the highest-frustration member (earliest on ties).
    pub representative: String,
    /// Category of the seed event.
    pub category: CorrectionCategory,
    /// In attachment order, seed first.
    pub member_event_ids: Vec<String>,
    /// Max of the members' frustration scores.
    pub aggregate_frustration: f64,
    /// Distinct sessions, sorted.
    pub session_ids: Vec<String>,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl PatternCluster {
    pub fn member_count(&self) -> usize {
        self.member_event_ids.len()
    }

    pub fn session_coverage(&self) -> usize {
        self.session_ids.len()
    }
}
