//! Error taxonomy.
//!
//! Only conditions that stop a unit of work are errors. Malformed lines and
//! structural anomalies are reported as counted diagnostics, never raised.

mod ingest_error;
mod store_error;

pub use ingest_error::IngestError;
pub use store_error::StoreError;

/// Convenience alias used throughout the workspace.
pub type HindsightResult<T> = Result<T, HindsightError>;

/// Top-level error for every Hindsight crate.
#[derive(Debug, thiserror::Error)]
pub enum HindsightError {
    #[error("ingest error: {0}")]
    IngestError(#[from] IngestError),

    #[error("memory store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("invalid configuration: {reason}")]
    ConfigError { reason: String },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
