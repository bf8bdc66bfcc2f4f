//! FeedbackDetector: scans one conversation tree for corrections and approvals.

use hindsight_consolidation::algorithms::text_similarity;
use hindsight_core::config::DetectionConfig;
use hindsight_core::models::{ApprovalEvent, CorrectionEvent};
use hindsight_observability::events;
use hindsight_transcript::ConversationTree;
use serde::Serialize;
use tracing::debug;

use crate::analysis::{
    classify_turn, collect_context, frustration_score, is_injected, ContextWindow, Signal,
};

/// Feedback found in one session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionOutput {
    pub session_id: String,
    /// In file order.
    pub corrections: Vec<CorrectionEvent>,
    /// In file order.
    pub approvals: Vec<ApprovalEvent>,
    /// MAIN user turns with typed text that were tested against the tables.
    pub user_turns_scanned: usize,
    /// MAIN user turns skipped as tool-result carriers or harness markup.
    pub injected_turns_skipped: usize,
    /// MAIN user turns with no typed text, e.g. image-only messages.
    pub empty_turns_skipped: usize,
}

/// Correction/approval detector.
///
/// Only MAIN entries are scanned. Sidechain entries are sub-agent work and
/// never carry user feedback.
#[derive(Debug, Clone, Default)]
pub struct FeedbackDetector {
    config: DetectionConfig,
}

impl FeedbackDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn detect(&self, tree: &ConversationTree) -> DetectionOutput {
        let session_id = tree.session_id();
        let _span = hindsight_observability::detection_span!(session_id).entered();

        let mut output = DetectionOutput {
            session_id: session_id.to_string(),
            ..DetectionOutput::default()
        };
        // Context windows of earlier corrections, for repeat detection.
        let mut prior_contexts: Vec<ContextWindow> = Vec::new();

        for idx in tree.main_indices() {
            let entry = &tree.entries()[idx];
            if !entry.is_user_turn() {
                continue;
            }
            if entry.is_tool_result_carrier() || is_injected(&entry.text) {
                output.injected_turns_skipped += 1;
                continue;
            }
            if entry.text.trim().is_empty() {
                output.empty_turns_skipped += 1;
                continue;
            }
            output.user_turns_scanned += 1;

            let Some(signal) = classify_turn(&entry.text, self.config.approval_max_tokens) else {
                continue;
            };
            let context = collect_context(tree, idx, self.config.lookback_window);
            let id = format!("{}:{}", session_id, entry.id);

            match signal {
                Signal::Correction(category) => {
                    let repeats = output
                        .corrections
                        .iter()
                        .zip(&prior_contexts)
                        .filter(|(prior, prior_context)| {
                            prior_context.shares_entry_with(&context)
                                || text_similarity(&prior.text, &entry.text)
                                    >= self.config.repeat_similarity_threshold
                        })
                        .count();
                    let score = frustration_score(category, &entry.text, repeats, &self.config);
                    debug!(
                        event_id = %id,
                        category = %category,
                        repeats,
                        score,
                        "correction detected"
                    );

                    prior_contexts.push(context.clone());
                    output.corrections.push(CorrectionEvent {
                        id,
                        session_id: session_id.to_string(),
                        entry_id: entry.id.clone(),
                        category,
                        text: entry.text.clone(),
                        context_ids: context.ids,
                        context_tools: context.tools,
                        frustration_score: score,
                        timestamp: entry.timestamp,
                        sequence: idx,
                    });
                }
                Signal::Approval(category) => {
                    debug!(event_id = %id, category = %category, "approval detected");
                    output.approvals.push(ApprovalEvent {
                        id,
                        session_id: session_id.to_string(),
                        entry_id: entry.id.clone(),
                        category,
                        text: entry.text.clone(),
                        context_ids: context.ids,
                        context_tools: context.tools,
                        timestamp: entry.timestamp,
                        sequence: idx,
                    });
                }
            }
        }

        events::feedback_detected(session_id, output.corrections.len(), output.approvals.len());
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsight_core::models::{CorrectionCategory, Entry, EntryKind, Role};

    fn entry(id: &str, parent: Option<&str>, kind: EntryKind, text: &str) -> Entry {
        Entry {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            role: match kind {
                EntryKind::UserTurn => Role::User,
                _ => Role::Assistant,
            },
            kind,
            timestamp: None,
            is_sidechain: false,
            text: text.to_string(),
            tool_calls: vec![],
            tool_results: vec![],
            internal_reasoning: None,
            line_number: 0,
        }
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = ConversationTree::build("s", vec![]);
        let out = FeedbackDetector::default().detect(&tree);
        assert!(out.corrections.is_empty());
        assert!(out.approvals.is_empty());
        assert_eq!(out.user_turns_scanned, 0);
    }

    #[test]
    fn repeated_correction_in_session_scores_higher() {
        let tree = ConversationTree::build(
            "s",
            vec![
                entry("u1", None, EntryKind::UserTurn, "write the parser"),
                entry("a1", Some("u1"), EntryKind::AssistantTurn, "done"),
                entry("u2", Some("a1"), EntryKind::UserTurn, "don't use unwrap"),
                entry("a2", Some("u2"), EntryKind::AssistantTurn, "fixed"),
                entry("u3", Some("a2"), EntryKind::UserTurn, "don't use unwrap"),
            ],
        );
        let out = FeedbackDetector::default().detect(&tree);
        assert_eq!(out.corrections.len(), 2);
        assert!(out.corrections[1].frustration_score > out.corrections[0].frustration_score);
        assert_eq!(out.corrections[0].category, CorrectionCategory::NegationImperative);
    }

    #[test]
    fn event_ids_are_session_scoped() {
        let tree =
            ConversationTree::build("sess", vec![entry("u", None, EntryKind::UserTurn, "No.")]);
        let out = FeedbackDetector::default().detect(&tree);
        assert_eq!(out.corrections[0].id, "sess:u");
        assert!(out.corrections[0].context_ids.is_empty());
    }

    #[test]
    fn textless_user_turn_is_counted_not_scanned() {
        let tree = ConversationTree::build(
            "s",
            vec![
                entry("u1", None, EntryKind::UserTurn, ""),
                entry("a1", Some("u1"), EntryKind::AssistantTurn, "that screenshot shows a 500"),
                entry("u2", Some("a1"), EntryKind::UserTurn, "  \n"),
            ],
        );
        let out = FeedbackDetector::default().detect(&tree);
        assert_eq!(out.empty_turns_skipped, 2);
        assert_eq!(out.user_turns_scanned, 0);
        assert_eq!(out.injected_turns_skipped, 0);
    }
}
