//! Memory tier mapper.
//!
//! A total decision table over one run's output. Every pattern, residual
//! correction and approval lands in exactly one record or in the
//! `not_persisted` count:
//!
//! | input                                              | kind       | tier          |
//! |----------------------------------------------------|------------|---------------|
//! | pattern, frustration ≥ anchor threshold            | pattern    | anchor        |
//! | pattern, below anchor threshold                    | pattern    | long-term     |
//! | approval after a decision tool                     | decision   | long-term     |
//! | approvals of one category, ≥ repetition threshold  | approval   | long-term     |
//! | lone approval, single-session capture on           | approval   | session-scoped|
//! | residual correction, single-session capture on     | correction | session-scoped|
//! | lone approval or residual correction, capture off  | (counted, not persisted)   |

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use hindsight_consolidation::{merge_order, MergeKey};
use hindsight_core::config::TieringConfig;
use hindsight_core::constants::metadata_keys;
use hindsight_core::models::{
    ApprovalCategory, ApprovalEvent, CorrectionEvent, MemoryKind, MemoryRecord, PatternCluster,
    Tier,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// Records produced by one tiering pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TieringOutput {
    pub records: Vec<MemoryRecord>,
    /// Inputs that mapped to no record because single-session capture is off.
    pub not_persisted: usize,
}

/// Maps patterns and events to tiered memory records. Performs no I/O.
#[derive(Debug, Clone)]
pub struct TierMapper {
    config: TieringConfig,
    repetition_threshold: usize,
    project_scope: Option<String>,
}

impl TierMapper {
    pub fn new(config: &TieringConfig, repetition_threshold: usize) -> Self {
        Self {
            config: config.clone(),
            repetition_threshold,
            project_scope: None,
        }
    }

    /// Tag every record with the project scope the caller analyzed.
    pub fn with_project_scope(mut self, scope: Option<String>) -> Self {
        self.project_scope = scope;
        self
    }

    /// Tier a pattern: anchor when repeated and frustrating enough, long-term otherwise.
    pub fn pattern_tier(&self, pattern: &PatternCluster) -> Tier {
        if pattern.member_count() >= self.repetition_threshold
            && pattern.aggregate_frustration >= self.config.anchor_threshold
        {
            Tier::Anchor
        } else {
            Tier::LongTerm
        }
    }

    /// First configured decision tool found in the approval's context.
    fn decision_tool<'a>(&self, approval: &'a ApprovalEvent) -> Option<&'a str> {
        approval
            .context_tools
            .iter()
            .find(|tool| self.config.decision_tools.iter().any(|d| d == *tool))
            .map(String::as_str)
    }

    pub fn map(
        &self,
        patterns: &[PatternCluster],
        residual: &[CorrectionEvent],
        approvals: &[ApprovalEvent],
    ) -> TieringOutput {
        let _span = hindsight_observability::tiering_span!(patterns.len()).entered();
        let mut output = TieringOutput::default();

        for pattern in patterns {
            output.records.push(self.pattern_record(pattern));
        }

        let approvals: Vec<&ApprovalEvent> = approvals.iter().collect();
        let ordered = merge_order(approvals, |a| MergeKey {
            session_id: &a.session_id,
            sequence: a.sequence,
            timestamp: a.timestamp,
        });

        let mut by_category: BTreeMap<ApprovalCategory, Vec<&ApprovalEvent>> = BTreeMap::new();
        for approval in ordered {
            match self.decision_tool(approval) {
                Some(tool) => output.records.push(self.decision_record(approval, tool)),
                None => by_category.entry(approval.category).or_default().push(approval),
            }
        }

        for (category, group) in &by_category {
            if group.len() >= self.repetition_threshold {
                output.records.push(self.approval_group_record(*category, group));
            } else if self.config.capture_single_session {
                for approval in group {
                    output.records.push(self.single_approval_record(approval));
                }
            } else {
                output.not_persisted += group.len();
            }
        }

        for correction in residual {
            if self.config.capture_single_session {
                output.records.push(self.single_correction_record(correction));
            } else {
                output.not_persisted += 1;
            }
        }

        debug!(
            records = output.records.len(),
            not_persisted = output.not_persisted,
            "tiering complete"
        );
        output
    }

    fn record(
        &self,
        content: String,
        memory_kind: MemoryKind,
        tier: Tier,
        mut metadata: Metadata,
    ) -> MemoryRecord {
        if let Some(scope) = &self.project_scope {
            metadata.insert(metadata_keys::PROJECT_SCOPE.to_string(), json!(scope));
        }
        MemoryRecord {
            content,
            memory_kind,
            tier,
            metadata,
        }
    }

    fn pattern_record(&self, pattern: &PatternCluster) -> MemoryRecord {
        let mut metadata = Metadata::new();
        metadata.insert(metadata_keys::CLUSTER_ID.to_string(), json!(pattern.id));
        metadata.insert(
            metadata_keys::CATEGORY.to_string(),
            json!(pattern.category.label()),
        );
        metadata.insert(
            metadata_keys::MEMBER_COUNT.to_string(),
            json!(pattern.member_count()),
        );
        metadata.insert(
            metadata_keys::SESSION_IDS.to_string(),
            json!(pattern.session_ids),
        );
        metadata.insert(
            metadata_keys::SESSION_COVERAGE.to_string(),
            json!(pattern.session_coverage()),
        );
        metadata.insert(
            metadata_keys::FRUSTRATION.to_string(),
            json!(pattern.aggregate_frustration),
        );
        metadata.insert(
            metadata_keys::EVENT_IDS.to_string(),
            json!(pattern.member_event_ids),
        );
        insert_span(&mut metadata, pattern.first_seen, pattern.last_seen);
        self.record(
            pattern.representative.clone(),
            MemoryKind::Pattern,
            self.pattern_tier(pattern),
            metadata,
        )
    }

    fn decision_record(&self, approval: &ApprovalEvent, tool: &str) -> MemoryRecord {
        let mut metadata = approval_metadata(std::slice::from_ref(&approval));
        metadata.insert(metadata_keys::CATEGORY.to_string(), json!(tool));
        self.record(
            format!("approved via {tool}: {}", approval.text),
            MemoryKind::Decision,
            Tier::LongTerm,
            metadata,
        )
    }

    fn approval_group_record(
        &self,
        category: ApprovalCategory,
        group: &[&ApprovalEvent],
    ) -> MemoryRecord {
        let mut metadata = approval_metadata(group);
        metadata.insert(metadata_keys::CATEGORY.to_string(), json!(category.label()));
        // Earliest member speaks for the group.
        let content = group.first().map(|a| a.text.clone()).unwrap_or_default();
        self.record(content, MemoryKind::Approval, Tier::LongTerm, metadata)
    }

    fn single_approval_record(&self, approval: &ApprovalEvent) -> MemoryRecord {
        let mut metadata = approval_metadata(std::slice::from_ref(&approval));
        metadata.insert(
            metadata_keys::CATEGORY.to_string(),
            json!(approval.category.label()),
        );
        self.record(
            approval.text.clone(),
            MemoryKind::Approval,
            Tier::SessionScoped,
            metadata,
        )
    }

    fn single_correction_record(&self, correction: &CorrectionEvent) -> MemoryRecord {
        let mut metadata = Metadata::new();
        metadata.insert(
            metadata_keys::CATEGORY.to_string(),
            json!(correction.category.label()),
        );
        metadata.insert(metadata_keys::SESSION_IDS.to_string(), json!([correction.session_id]));
        metadata.insert(metadata_keys::EVENT_IDS.to_string(), json!([correction.id]));
        metadata.insert(
            metadata_keys::FRUSTRATION.to_string(),
            json!(correction.frustration_score),
        );
        insert_span(&mut metadata, correction.timestamp, correction.timestamp);
        self.record(
            correction.text.clone(),
            MemoryKind::Correction,
            Tier::SessionScoped,
            metadata,
        )
    }
}

type Metadata = BTreeMap<String, Value>;

fn approval_metadata(group: &[&ApprovalEvent]) -> Metadata {
    let sessions: BTreeSet<&str> = group.iter().map(|a| a.session_id.as_str()).collect();
    let first_seen = group.iter().filter_map(|a| a.timestamp).min();
    let last_seen = group.iter().filter_map(|a| a.timestamp).max();

    let mut metadata = Metadata::new();
    metadata.insert(metadata_keys::MEMBER_COUNT.to_string(), json!(group.len()));
    metadata.insert(metadata_keys::SESSION_IDS.to_string(), json!(sessions));
    metadata.insert(metadata_keys::SESSION_COVERAGE.to_string(), json!(sessions.len()));
    metadata.insert(
        metadata_keys::EVENT_IDS.to_string(),
        json!(group.iter().map(|a| a.id.as_str()).collect::<Vec<_>>()),
    );
    insert_span(&mut metadata, first_seen, last_seen);
    metadata
}

fn insert_span(
    metadata: &mut Metadata,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
) {
    metadata.insert(
        metadata_keys::FIRST_SEEN.to_string(),
        json!(first.map(|t| t.to_rfc3339())),
    );
    metadata.insert(
        metadata_keys::LAST_SEEN.to_string(),
        json!(last.map(|t| t.to_rfc3339())),
    );
}
