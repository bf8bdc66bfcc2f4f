/// Errors surfaced by an external memory store while accepting records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record rejected: {reason}")]
    Rejected { reason: String },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },
}
