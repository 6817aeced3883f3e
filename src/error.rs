//! Error types shared by every storage wrapper.
//!
//! Remote failures have their own [`RemoteError`] and never escape a wrapper:
//! they are logged and the local branch runs instead.

use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidFormat(String),

    #[error("Invalid amount '{0}', expected a non-negative number")]
    InvalidAmount(String),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid data file: {0}")]
    InvalidFile(String),

    #[error("Stored data under '{key}' is unreadable: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("Invalid setting {0}")]
    Config(String),

    #[error("Local store failed: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single remote call. Always recoverable through the local mirror.
#[derive(Error, Debug)]
pub(crate) enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("remote disabled (offline mode)")]
    Offline,
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
