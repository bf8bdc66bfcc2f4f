//! Transcript fixtures for Hindsight tests.
//!
//! Provides the checked-in JSONL transcripts under `transcripts/` and a small
//! builder for writing synthetic transcripts line by line.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

/// Root directory of the checked-in transcript fixtures.
pub fn transcripts_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("transcripts")
}

/// Absolute path to a checked-in transcript fixture.
pub fn transcript_path(name: &str) -> PathBuf {
    transcripts_root().join(name)
}

/// Load a checked-in transcript fixture as raw text.
///
/// # Panics
/// Panics if the file doesn't exist.
pub fn load_transcript(name: &str) -> String {
    let path = transcript_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Builds JSONL transcript lines in the upstream logger's shape.
///
/// Timestamps advance by one minute per line from `start`, so file order and
/// chronological order agree unless a test overrides them.
pub struct TranscriptBuilder {
    session_id: String,
    start: DateTime<Utc>,
    lines: Vec<String>,
}

impl TranscriptBuilder {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            start: Utc
                .with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
            lines: Vec::new(),
        }
    }

    /// Start the clock at a different instant (for cross-session ordering).
    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    fn next_timestamp(&self) -> String {
        (self.start + Duration::minutes(self.lines.len() as i64)).to_rfc3339()
    }

    fn envelope(&self, kind: &str, id: &str, parent: Option<&str>, sidechain: bool) -> Value {
        json!({
            "type": kind,
            "uuid": id,
            "parentUuid": parent,
            "isSidechain": sidechain,
            "sessionId": self.session_id,
            "timestamp": self.next_timestamp(),
            "cwd": "/work/project",
            "version": "1.0.0",
        })
    }

    /// A user turn with plain string content.
    pub fn user(self, id: &str, parent: Option<&str>, text: &str) -> Self {
        self.message("user", id, parent, false, json!(text))
    }

    /// An assistant turn with a text block and optional tool calls.
    pub fn assistant(self, id: &str, parent: Option<&str>, text: &str, tools: &[&str]) -> Self {
        let mut blocks = vec![json!({ "type": "text", "text": text })];
        for (i, tool) in tools.iter().enumerate() {
            blocks.push(json!({
                "type": "tool_use",
                "id": format!("toolu_{id}_{i}"),
                "name": tool,
                "input": { "command": "ls" },
            }));
        }
        self.message("assistant", id, parent, false, Value::Array(blocks))
    }

    /// A user-role entry carrying a tool result.
    pub fn tool_result(self, id: &str, parent: Option<&str>, output: &str, is_error: bool) -> Self {
        let blocks = json!([{
            "type": "tool_result",
            "tool_use_id": format!("toolu_{}", parent.unwrap_or("none")),
            "content": output,
            "is_error": is_error,
        }]);
        self.message("user", id, parent, false, blocks)
    }

    /// A sidechain (sub-agent) entry.
    pub fn sidechain(self, kind: &str, id: &str, parent: Option<&str>, text: &str) -> Self {
        self.message(kind, id, parent, true, json!(text))
    }

    /// Any message entry with explicit content and sidechain flag.
    pub fn message(
        mut self,
        role: &str,
        id: &str,
        parent: Option<&str>,
        sidechain: bool,
        content: Value,
    ) -> Self {
        let mut line = self.envelope(role, id, parent, sidechain);
        line["message"] = json!({ "role": role, "content": content });
        self.lines.push(line.to_string());
        self
    }

    /// Append a raw line verbatim (malformed or unusual records).
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// The JSONL document.
    pub fn build(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the transcript to `<dir>/<session_id>.jsonl` and return its path.
    pub fn write_to(&self, dir: &std::path::Path) -> PathBuf {
        let path = dir.join(format!("{}.jsonl", self.session_id));
        let mut file = std::fs::File::create(&path)
            .unwrap_or_else(|e| panic!("Failed to create {}: {}", path.display(), e));
        file.write_all(self.build().as_bytes())
            .unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
        path
    }
}

/// A fresh temporary directory for on-disk transcripts.
pub fn temp_project_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap_or_else(|e| panic!("Failed to create temp dir: {}", e))
}
