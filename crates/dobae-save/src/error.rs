//! Error types for save operations.

use thiserror::Error;

/// Errors that can occur while persisting or mirroring saves.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The remote mirror rejected a push.
    #[error("Mirror error: {0}")]
    Mirror(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for save operations.
pub type Result<T> = std::result::Result<T, Error>;
