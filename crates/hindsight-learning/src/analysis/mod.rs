//! Per-turn analysis: indicator tables, frustration scoring, context windows.

pub mod context;
pub mod indicators;
pub mod injected;
pub mod scoring;

pub use context::{collect_context, ContextWindow};
pub use indicators::{base_weight, classify_turn, Signal};
pub use injected::is_injected;
pub use scoring::{frustration_score, intensity_bonus};
