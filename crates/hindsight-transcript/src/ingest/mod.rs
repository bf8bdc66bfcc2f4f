//! Transcript ingestion: JSON-Lines bytes → ordered, normalized entries.
//!
//! A malformed line never aborts ingestion; it is recorded as a
//! [`SkippedLine`] and the rest of the file is read. Only a file that cannot
//! be opened at all is an error.

mod normalize;
mod raw;

use std::path::{Path, PathBuf};

use hindsight_core::constants::TRANSCRIPT_EXTENSION;
use hindsight_core::errors::IngestError;
use hindsight_core::models::Entry;
use hindsight_observability::events;
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use raw::RawLine;

/// A line that could not be turned into an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 1-based.
    pub line_number: usize,
    pub reason: String,
}

/// One transcript snapshot, as read at analysis start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestedTranscript {
    pub session_id: String,
    pub path: Option<PathBuf>,
    /// In file order.
    pub entries: Vec<Entry>,
    pub skipped: Vec<SkippedLine>,
}

impl IngestedTranscript {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Read one transcript file. The file is read once; later appends by the
/// upstream writer are not observed.
pub fn ingest_file(path: impl AsRef<Path>) -> Result<IngestedTranscript, IngestError> {
    let path = path.as_ref();
    let _span = hindsight_observability::ingest_span!(path.display()).entered();

    let bytes = std::fs::read(path).map_err(|e| IngestError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let fallback_session = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());

    let mut transcript = ingest_bytes(&bytes, &fallback_session);
    transcript.path = Some(path.to_path_buf());

    events::transcript_ingested(
        &path.display().to_string(),
        &transcript.session_id,
        transcript.entries.len(),
        transcript.skipped_count(),
    );
    Ok(transcript)
}

/// Ingest an in-memory JSONL document.
pub fn ingest_str(contents: &str, fallback_session: &str) -> IngestedTranscript {
    ingest_bytes(contents.as_bytes(), fallback_session)
}

fn ingest_bytes(bytes: &[u8], fallback_session: &str) -> IngestedTranscript {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    let mut session_id: Option<String> = None;

    for (idx, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line_number = idx + 1;
        // A crashed writer can leave invalid UTF-8 as well as truncated JSON.
        let line = match std::str::from_utf8(raw_line) {
            Ok(line) => line.trim(),
            Err(e) => {
                skip(&mut skipped, line_number, format!("invalid utf-8: {e}"));
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok(raw) => {
                if session_id.is_none() {
                    session_id = raw.session_id.clone().filter(|s| !s.is_empty());
                }
                entries.push(normalize::normalize(raw, line_number));
            }
            Err(reason) => skip(&mut skipped, line_number, reason),
        }
    }

    IngestedTranscript {
        session_id: session_id.unwrap_or_else(|| fallback_session.to_string()),
        path: None,
        entries,
        skipped,
    }
}

/// Parse once as a raw value so non-object lines are rejected before the
/// typed pass; a derived struct would otherwise accept a JSON array.
fn parse_line(line: &str) -> Result<RawLine, String> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("line is not a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

fn skip(skipped: &mut Vec<SkippedLine>, line_number: usize, reason: String) {
    debug!(line_number, reason = %reason, "skipping malformed transcript line");
    skipped.push(SkippedLine {
        line_number,
        reason,
    });
}

/// List the transcript files directly under a project directory, sorted by
/// file name. The directory itself is the project scope.
pub fn discover_transcripts(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, IngestError> {
    let dir = dir.as_ref();
    let unreadable = |reason: String| IngestError::DirectoryUnreadable {
        path: dir.display().to_string(),
        reason,
    };
    if !dir.is_dir() {
        return Err(unreadable("not a directory".to_string()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| unreadable(e.to_string()))?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == TRANSCRIPT_EXTENSION)
        {
            paths.push(path.to_path_buf());
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_not_counted() {
        let t = ingest_str("\n\n{\"type\":\"user\",\"uuid\":\"u\"}\n\n", "s");
        assert_eq!(t.entries.len(), 1);
        assert_eq!(t.skipped_count(), 0);
    }

    #[test]
    fn truncated_trailing_line_is_skipped() {
        let t = ingest_str("{\"type\":\"user\",\"uuid\":\"u\"}\n{\"type\":\"assis", "s");
        assert_eq!(t.entries.len(), 1);
        assert_eq!(t.skipped_count(), 1);
        assert_eq!(t.skipped[0].line_number, 2);
    }

    #[test]
    fn non_object_json_is_skipped() {
        let t = ingest_str("[]\n42\n\"text\"\n", "s");
        assert!(t.entries.is_empty());
        assert_eq!(t.skipped_count(), 3);
    }

    #[test]
    fn invalid_utf8_is_skipped() {
        let mut bytes = b"{\"type\":\"user\",\"uuid\":\"u\"}\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let t = ingest_bytes(&bytes, "s");
        assert_eq!(t.entries.len(), 1);
        assert_eq!(t.skipped_count(), 1);
    }

    #[test]
    fn session_id_comes_from_first_entry_that_has_one() {
        let t = ingest_str(
            "{\"type\":\"summary\",\"summary\":\"x\"}\n{\"type\":\"user\",\"uuid\":\"u\",\"sessionId\":\"abc\"}\n",
            "fallback",
        );
        assert_eq!(t.session_id, "abc");
    }

    #[test]
    fn session_id_falls_back_when_absent() {
        let t = ingest_str("{\"type\":\"user\",\"uuid\":\"u\"}\n", "fallback");
        assert_eq!(t.session_id, "fallback");
    }

    #[test]
    fn empty_input_yields_empty_transcript() {
        let t = ingest_str("", "s");
        assert!(t.entries.is_empty());
        assert_eq!(t.skipped_count(), 0);
    }
}
