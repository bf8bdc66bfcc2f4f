//! Span definitions per pipeline stage: ingest, tree, detection, clustering, tiering.

/// Create an ingest span for one transcript file.
#[macro_export]
macro_rules! ingest_span {
    ($path:expr) => {
        tracing::info_span!("hindsight.ingest", path = %$path)
    };
}

/// Create a tree-building span.
#[macro_export]
macro_rules! tree_span {
    ($session_id:expr, $entry_count:expr) => {
        tracing::info_span!("hindsight.tree", session_id = %$session_id, entries = $entry_count)
    };
}

/// Create a detection span.
#[macro_export]
macro_rules! detection_span {
    ($session_id:expr) => {
        tracing::info_span!("hindsight.detection", session_id = %$session_id)
    };
}

/// Create a clustering span.
#[macro_export]
macro_rules! clustering_span {
    ($event_count:expr) => {
        tracing::info_span!("hindsight.clustering", events = $event_count)
    };
}

/// Create a tiering span.
#[macro_export]
macro_rules! tiering_span {
    ($cluster_count:expr) => {
        tracing::info_span!("hindsight.tiering", clusters = $cluster_count)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const INGEST: &str = "hindsight.ingest";
    pub const TREE: &str = "hindsight.tree";
    pub const DETECTION: &str = "hindsight.detection";
    pub const CLUSTERING: &str = "hindsight.clustering";
    pub const TIERING: &str = "hindsight.tiering";
}
