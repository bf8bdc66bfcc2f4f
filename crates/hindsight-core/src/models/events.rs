use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Correction indicator categories, in match-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionCategory {
    /// Repeated-instruction complaints ("I already told you").
    Escalation,
    /// Requests to undo what was just done.
    Revert,
    /// Negation followed by an imperative correction ("no, use Y instead").
    NegationImperative,
    /// The user interrupted the assistant mid-turn.
    Interruption,
    /// A plain "no" with nothing else to go on.
    BareNegation,
}

impl CorrectionCategory {
    /// All categories in match-priority order.
    pub const ALL: [CorrectionCategory; 5] = [
        Self::Escalation,
        Self::Revert,
        Self::NegationImperative,
        Self::Interruption,
        Self::BareNegation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Escalation => "escalation",
            Self::Revert => "revert",
            Self::NegationImperative => "negation+imperative",
            Self::Interruption => "interruption",
            Self::BareNegation => "bare_negation",
        }
    }
}

impl fmt::Display for CorrectionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Approval indicator categories, in match-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalCategory {
    /// "perfect", "looks good", "lgtm".
    ExplicitApproval,
    /// "go ahead", "proceed", "yes".
    Proceed,
}

impl ApprovalCategory {
    pub const ALL: [ApprovalCategory; 2] = [Self::ExplicitApproval, Self::Proceed];

    pub fn label(self) -> &'static str {
        match self {
            Self::ExplicitApproval => "explicit_approval",
            Self::Proceed => "proceed",
        }
    }
}

impl fmt::Display for ApprovalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A detected user correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionEvent {
    /// `"{session_id}:{entry_id}"`.
    pub id: String,
    pub session_id: String,
    /// The user entry that triggered the event.
    pub entry_id: String,
    pub category: CorrectionCategory,
    /// The user's words.
    pub text: String,
    /// Preceding assistant entries, oldest first. May be empty.
    pub context_ids: Vec<String>,
    /// Tool names called by the context entries, in order.
    pub context_tools: Vec<String>,
    /// Always within [0, 1].
    pub frustration_score: f64,
    pub timestamp: Option<DateTime<Utc>>,
    /// Position of the triggering entry in its transcript.
    pub sequence: usize,
}

/// A detected user approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub id: String,
    pub session_id: String,
    pub entry_id: String,
    pub category: ApprovalCategory,
    pub text: String,
    pub context_ids: Vec<String>,
    pub context_tools: Vec<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub sequence: usize,
}
