use scrub_shared::ProtocolError;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// An operation-log or chat-state blob could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] ProtocolError),

    /// Cached metadata column held invalid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// A row exists but its contents could not be decoded.
    pub fn is_undecodable(&self) -> bool {
        matches!(self, Self::Codec(_) | Self::Json(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
