use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an entry sits in the conversation structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Main,
    Sidechain,
    Orphan,
}

/// A parent whose non-sidechain children fork the conversation (retry branch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchPoint {
    pub parent_id: String,
    /// Children in file order.
    pub child_ids: Vec<String>,
    /// Parallel to `child_ids`.
    pub child_timestamps: Vec<Option<DateTime<Utc>>>,
}

impl BranchPoint {
    /// The most recently written child, i.e. the branch the session continued on.
    pub fn latest_child(&self) -> Option<&str> {
        self.child_ids
            .iter()
            .zip(&self.child_timestamps)
            .enumerate()
            .max_by_key(|(idx, (_, ts))| (**ts, *idx))
            .map(|(_, (id, _))| id.as_str())
    }
}

/// Structural problems found while building the tree. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// `parent_id` references an id absent from the transcript.
    MissingParent { parent_id: String },
    /// Non-sidechain entry found under a sidechain ancestor.
    SidechainFlagMismatch { sidechain_ancestor: String },
    /// A later line reused an id already seen; the later line was dropped.
    DuplicateId { line_number: usize },
    /// Only reachable through a parent cycle.
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralAnomaly {
    pub entry_id: String,
    #[serde(flatten)]
    pub kind: AnomalyKind,
}
