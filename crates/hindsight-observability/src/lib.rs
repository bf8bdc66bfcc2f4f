//! # hindsight-observability
//!
//! Structured tracing for the analysis pipeline: subscriber setup, one span
//! per stage, and named log events for the things an operator audits
//! (skipped lines, structural anomalies, promoted patterns, emitted records).

pub mod tracing_setup;

pub use tracing_setup::{events, init_from_config, init_tracing, init_tracing_with_filter};
