//! # hindsight-core
//!
//! Foundation crate for the Hindsight transcript analysis engine.
//! Defines the entry/event/cluster/record models, errors, config, and the
//! memory store trait. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::HindsightConfig;
pub use errors::{HindsightError, HindsightResult};
pub use models::{
    ApprovalEvent, Classification, CorrectionEvent, Entry, EntryKind, MemoryKind, MemoryRecord,
    PatternCluster, Role, Tier,
};
pub use traits::IMemoryStore;
