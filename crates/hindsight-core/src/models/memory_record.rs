use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// What a memory record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Correction,
    Pattern,
    Approval,
    Decision,
}

/// How long the external store should keep a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    SessionScoped,
    LongTerm,
    Anchor,
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Correction => "correction",
            Self::Pattern => "pattern",
            Self::Approval => "approval",
            Self::Decision => "decision",
        })
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SessionScoped => "session_scoped",
            Self::LongTerm => "long_term",
            Self::Anchor => "anchor",
        })
    }
}

/// Final output unit handed to the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub content: String,
    pub memory_kind: MemoryKind,
    pub tier: Tier,
    /// Sorted keys so serialized output is deterministic.
    pub metadata: BTreeMap<String, serde_json::Value>,
}
