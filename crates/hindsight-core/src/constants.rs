/// Hindsight engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extension of transcript logs.
pub const TRANSCRIPT_EXTENSION: &str = "jsonl";

/// Marker the upstream logger writes when the user interrupts a turn.
pub const INTERRUPT_MARKER: &str = "[request interrupted by user";

/// Metadata keys attached to emitted memory records.
pub mod metadata_keys {
    pub const SESSION_IDS: &str = "session_ids";
    pub const MEMBER_COUNT: &str = "member_count";
    pub const SESSION_COVERAGE: &str = "session_coverage";
    pub const FIRST_SEEN: &str = "first_seen";
    pub const LAST_SEEN: &str = "last_seen";
    pub const CATEGORY: &str = "category";
    pub const FRUSTRATION: &str = "frustration";
    pub const CLUSTER_ID: &str = "cluster_id";
    pub const EVENT_IDS: &str = "event_ids";
    pub const PROJECT_SCOPE: &str = "project_scope";
}
