//! Property tests for detector invariants.

use hindsight_core::config::DetectionConfig;
use hindsight_learning::FeedbackDetector;
use hindsight_transcript::{ingest_str, ConversationTree};
use proptest::prelude::*;
use test_fixtures::TranscriptBuilder;

fn feedback_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("no".to_string()),
        Just("NO!!! STOP!!!".to_string()),
        Just("I already told you, you keep doing this!!!".to_string()),
        Just("undo that".to_string()),
        Just("don't use unwrap".to_string()),
        Just("perfect".to_string()),
        Just("[Request interrupted by user]".to_string()),
        "[a-zA-Z !,.']{0,40}",
    ]
}

proptest! {
    #[test]
    fn frustration_stays_in_unit_range(
        texts in prop::collection::vec(feedback_text(), 1..12),
        bonus in 0.0f64..=1.0,
        steps in 0usize..10,
    ) {
        let mut builder = TranscriptBuilder::new("s");
        let mut parent: Option<String> = None;
        for (i, text) in texts.iter().enumerate() {
            let user_id = format!("u{i}");
            let assistant_id = format!("a{i}");
            builder = builder
                .user(&user_id, parent.as_deref(), text)
                .assistant(&assistant_id, Some(&user_id), "ok", &["Edit"]);
            parent = Some(assistant_id);
        }
        let transcript = ingest_str(&builder.build(), "s");
        let tree = ConversationTree::build(&transcript.session_id, transcript.entries);
        let config = DetectionConfig {
            escalation_bonus: bonus,
            max_escalation_steps: steps,
            ..DetectionConfig::default()
        };
        let out = FeedbackDetector::new(config).detect(&tree);
        for event in &out.corrections {
            prop_assert!((0.0..=1.0).contains(&event.frustration_score));
        }
    }

    #[test]
    fn sidechain_only_input_yields_no_events(
        texts in prop::collection::vec(feedback_text(), 1..10),
    ) {
        let mut builder =
            TranscriptBuilder::new("s").sidechain("assistant", "root", None, "working");
        for (i, text) in texts.iter().enumerate() {
            builder = builder.sidechain("user", &format!("s{i}"), Some("root"), text);
        }
        let transcript = ingest_str(&builder.build(), "s");
        let tree = ConversationTree::build(&transcript.session_id, transcript.entries);
        let out = FeedbackDetector::default().detect(&tree);
        prop_assert!(out.corrections.is_empty());
        prop_assert!(out.approvals.is_empty());
    }
}
