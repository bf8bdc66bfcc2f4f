//! # hindsight-engine
//!
//! Runs the whole analysis: each transcript is ingested, classified and
//! scanned for feedback independently (in parallel), then every event is
//! merged into one chronological clustering pass and mapped to memory tiers.
//! Nothing reaches the memory store until the full batch is computed.

pub mod engine;
pub mod report;
pub mod tiering;

pub use engine::AnalysisEngine;
pub use report::{AnalysisReport, AnalysisStats, FileFailure, RecordingStore};
pub use tiering::{TierMapper, TieringOutput};
