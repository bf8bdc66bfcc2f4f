//! Data model shared by every pipeline stage.

mod classification;
mod cluster;
mod entry;
mod events;
mod memory_record;

pub use classification::{AnomalyKind, BranchPoint, Classification, StructuralAnomaly};
pub use cluster::PatternCluster;
pub use entry::{Entry, EntryKind, Role, ToolCall, ToolResult};
pub use events::{ApprovalCategory, ApprovalEvent, CorrectionCategory, CorrectionEvent};
pub use memory_record::{MemoryKind, MemoryRecord, Tier};
