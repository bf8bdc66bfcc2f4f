//! # hindsight-transcript
//!
//! Reads append-only JSON-Lines session logs into normalized entries, then
//! classifies them into MAIN / SIDECHAIN / ORPHAN and finds retry branches.
//! Malformed lines and structural anomalies are counted, never raised.

pub mod ingest;
pub mod tree;

pub use ingest::{discover_transcripts, ingest_file, ingest_str, IngestedTranscript, SkippedLine};
pub use tree::{ClassificationCounts, ClassifiedEntry, ConversationTree};
