//! # hindsight-learning
//!
//! Feedback detection: scans the MAIN turns of a conversation tree for user
//! corrections and approvals, collects the assistant context they respond to,
//! and scores how frustrated each correction reads.

pub mod analysis;
pub mod detector;

pub use analysis::{classify_turn, Signal};
pub use detector::{DetectionOutput, FeedbackDetector};
