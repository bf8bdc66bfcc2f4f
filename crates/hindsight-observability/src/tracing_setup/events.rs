//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a transcript that finished ingesting.
pub fn transcript_ingested(path: &str, session_id: &str, entries: usize, skipped: usize) {
    tracing::info!(
        event = "transcript_ingested",
        path = %path,
        session_id = %session_id,
        entries = entries,
        skipped = skipped,
        "transcript ingested"
    );
}

/// Log a transcript that could not be read at all.
pub fn transcript_failed(path: &str, reason: &str) {
    tracing::warn!(
        event = "transcript_failed",
        path = %path,
        reason = %reason,
        "transcript unreadable, skipping file"
    );
}

/// Log the structural summary of one conversation tree.
pub fn tree_built(
    session_id: &str,
    main: usize,
    sidechain: usize,
    orphan: usize,
    anomalies: usize,
) {
    tracing::info!(
        event = "tree_built",
        session_id = %session_id,
        main = main,
        sidechain = sidechain,
        orphan = orphan,
        anomalies = anomalies,
        "conversation tree built"
    );
}

/// Log detector output for one session.
pub fn feedback_detected(session_id: &str, corrections: usize, approvals: usize) {
    tracing::info!(
        event = "feedback_detected",
        session_id = %session_id,
        corrections = corrections,
        approvals = approvals,
        "feedback detected"
    );
}

/// Log a cluster promoted to a pattern.
pub fn pattern_promoted(cluster_id: &str, member_count: usize, sessions: usize, frustration: f64) {
    tracing::info!(
        event = "pattern_promoted",
        cluster_id = %cluster_id,
        member_count = member_count,
        sessions = sessions,
        frustration = frustration,
        "pattern promoted"
    );
}

/// Log the completed analysis run.
pub fn analysis_completed(transcripts: usize, failures: usize, records: usize) {
    tracing::info!(
        event = "analysis_completed",
        transcripts = transcripts,
        failures = failures,
        records = records,
        "analysis completed"
    );
}

/// Log records handed to the external store.
pub fn records_emitted(count: usize) {
    tracing::info!(event = "records_emitted", count = count, "records emitted");
}
