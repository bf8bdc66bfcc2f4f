//! End-to-end tests: transcripts on disk → tiered memory records.

use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use hindsight_core::config::{HindsightConfig, TieringConfig};
use hindsight_core::constants::metadata_keys;
use hindsight_core::{MemoryKind, Tier};
use hindsight_engine::{AnalysisEngine, RecordingStore};
use serde_json::json;
use test_fixtures::{temp_project_dir, transcript_path, TranscriptBuilder};

fn session(id: &str, day: u32, correction: &str) -> TranscriptBuilder {
    TranscriptBuilder::new(id)
        .starting_at(Utc.with_ymd_and_hms(2025, 6, day, 9, 0, 0).unwrap())
        .user("u1", None, "Fix the flaky import")
        .assistant("a1", Some("u1"), "Wrapped it in a try block", &["Edit"])
        .user("u2", Some("a1"), correction)
}

#[test]
fn repeated_correction_across_sessions_becomes_long_term_pattern() {
    let dir = temp_project_dir();
    let paths = vec![
        session("sess-1", 1, "don't use try/except pass").write_to(dir.path()),
        session("sess-2", 2, "don't use try/except pass").write_to(dir.path()),
    ];

    let report = AnalysisEngine::default().analyze(&paths);

    assert!(report.failures.is_empty());
    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.memory_kind, MemoryKind::Pattern);
    assert_eq!(record.tier, Tier::LongTerm);
    assert_eq!(record.content, "don't use try/except pass");
    assert_eq!(record.metadata[metadata_keys::MEMBER_COUNT], json!(2));
    assert_eq!(record.metadata[metadata_keys::SESSION_IDS], json!(["sess-1", "sess-2"]));
    assert_eq!(record.metadata[metadata_keys::CATEGORY], json!("negation+imperative"));
    assert_eq!(report.stats.patterns_promoted, 1);
    assert_eq!(report.stats.residual_corrections, 0);
}

#[test]
fn frustrated_repetition_becomes_an_anchor() {
    let dir = temp_project_dir();
    let text = "I already told you not to use try/except pass";
    let paths = vec![
        session("sess-1", 1, text).write_to(dir.path()),
        session("sess-2", 2, text).write_to(dir.path()),
    ];
    let report = AnalysisEngine::default().analyze(&paths);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].tier, Tier::Anchor);
    assert_eq!(report.records_in(Tier::Anchor).count(), 1);
}

#[test]
fn unreadable_file_does_not_stop_the_run() {
    let dir = temp_project_dir();
    let good = session("sess-1", 1, "don't use try/except pass").write_to(dir.path());
    let missing = dir.path().join("gone.jsonl");

    let report = AnalysisEngine::default().analyze(&[missing.clone(), good]);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, missing);
    assert_eq!(report.stats.transcripts_requested, 2);
    assert_eq!(report.stats.transcripts_analyzed, 1);
    assert_eq!(report.stats.corrections, 1);
}

#[test]
fn single_corrections_are_counted_not_persisted_by_default() {
    let dir = temp_project_dir();
    let path = session("sess-1", 1, "no, use tabs instead").write_to(dir.path());
    let report = AnalysisEngine::default().analyze(&[path]);
    assert!(report.records.is_empty());
    assert_eq!(report.stats.residual_corrections, 1);
    assert_eq!(report.stats.not_persisted, 1);
}

#[test]
fn single_session_capture_persists_session_scoped_records() {
    let dir = temp_project_dir();
    let path = session("sess-1", 1, "no, use tabs instead").write_to(dir.path());
    let config = HindsightConfig {
        tiering: TieringConfig {
            capture_single_session: true,
            ..TieringConfig::default()
        },
        ..HindsightConfig::default()
    };
    let report = AnalysisEngine::new(config).analyze(&[path]);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].memory_kind, MemoryKind::Correction);
    assert_eq!(report.records[0].tier, Tier::SessionScoped);
    assert_eq!(report.stats.not_persisted, 0);
}

#[test]
fn plan_approval_becomes_a_decision() {
    let dir = temp_project_dir();
    let path = TranscriptBuilder::new("sess-plan")
        .user("u1", None, "migrate the config loader")
        .assistant("a1", Some("u1"), "Here is the plan", &["ExitPlanMode"])
        .user("u2", Some("a1"), "looks good")
        .write_to(dir.path());
    let report = AnalysisEngine::default().analyze(&[path]);
    let decisions: Vec<_> = report.records_of(MemoryKind::Decision).collect();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].tier, Tier::LongTerm);
    assert_eq!(decisions[0].metadata[metadata_keys::CATEGORY], json!("ExitPlanMode"));
}

#[test]
fn repeated_approvals_become_long_term() {
    let dir = temp_project_dir();
    let paths: Vec<PathBuf> = ["sess-1", "sess-2"]
        .iter()
        .map(|id| {
            TranscriptBuilder::new(id)
                .user("u1", None, "add a retry to the client")
                .assistant("a1", Some("u1"), "Added", &["Edit"])
                .user("u2", Some("a1"), "perfect, thanks")
                .write_to(dir.path())
        })
        .collect();
    let report = AnalysisEngine::default().analyze(&paths);
    let approvals: Vec<_> = report.records_of(MemoryKind::Approval).collect();
    assert_eq!(approvals.len(), 1);
    assert_eq!(approvals[0].tier, Tier::LongTerm);
    assert_eq!(approvals[0].metadata[metadata_keys::MEMBER_COUNT], json!(2));
}

#[test]
fn project_analysis_discovers_and_scopes() {
    let dir = temp_project_dir();
    session("sess-1", 1, "don't use try/except pass").write_to(dir.path());
    session("sess-2", 2, "don't use try/except pass").write_to(dir.path());
    std::fs::write(dir.path().join("notes.txt"), "not a transcript").unwrap();

    let report = AnalysisEngine::default().analyze_project(dir.path()).unwrap();
    assert_eq!(report.stats.transcripts_requested, 2);
    assert_eq!(
        report.records[0].metadata[metadata_keys::PROJECT_SCOPE],
        json!(dir.path().display().to_string())
    );
}

#[test]
fn every_unit_of_work_is_accounted_for() {
    let report = AnalysisEngine::default().analyze(&[transcript_path("branching.jsonl")]);
    let stats = &report.stats;
    assert_eq!(stats.entries, 13);
    assert_eq!(stats.skipped_lines, 2);
    assert_eq!(stats.duplicate_entries, 1);
    assert_eq!(stats.main_entries + stats.sidechain_entries + stats.orphan_entries, 12);
    assert_eq!(stats.sidechain_entries, 3);
    assert_eq!(stats.orphan_entries, 1);
    assert_eq!(stats.anomalies, 2);
    assert_eq!(stats.corrections, 0);
}

#[test]
fn repeated_runs_produce_identical_output() {
    let dir = temp_project_dir();
    let paths = vec![
        session("sess-1", 1, "don't use try/except pass").write_to(dir.path()),
        session("sess-2", 2, "don't use try/except pass").write_to(dir.path()),
        session("sess-3", 3, "undo that").write_to(dir.path()),
    ];
    let engine = AnalysisEngine::default();
    let first = engine.analyze(&paths).to_json().unwrap();
    let second = engine.analyze(&paths).to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn emission_happens_after_the_batch() {
    let dir = temp_project_dir();
    let paths = vec![
        session("sess-1", 1, "don't use try/except pass").write_to(dir.path()),
        session("sess-2", 2, "don't use try/except pass").write_to(dir.path()),
    ];
    let report = AnalysisEngine::default().analyze(&paths);
    let store = RecordingStore::new();
    assert_eq!(report.emit(&store).unwrap(), report.records.len());
    assert_eq!(store.records(), report.records);
}
