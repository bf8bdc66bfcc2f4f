/// Transcript ingestion errors. Each one is fatal for a single file only.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("transcript unreadable: {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("project directory unreadable: {path}: {reason}")]
    DirectoryUnreadable { path: String, reason: String },
}

impl IngestError {
    /// Path of the file or directory the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::Unreadable { path, .. } | Self::DirectoryUnreadable { path, .. } => path,
        }
    }
}
