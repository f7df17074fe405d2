//! Error types for councillor-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in councillor-core
#[derive(Debug, Error)]
pub enum Error {
    /// A dataset location does not exist
    #[error("no dataset found at '{path}'")]
    NotFound { path: PathBuf },

    /// Failed to read a file that does exist
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write or replace a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rows do not match the declared header
    #[error("malformed data in '{path}': {message}")]
    MalformedData { path: PathBuf, message: String },

    /// CSV error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Changes header differs from the master header
    #[error("changes header {found:?} does not match master header {expected:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// The key column is not part of the header
    #[error("key column '{column}' not found in header")]
    MissingKeyColumn { column: String },

    /// The same key appears on more than one row
    #[error("duplicate ids: {}", keys.join(", "))]
    DuplicateKey { keys: Vec<String> },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`Error`], one per distinct failure the
/// caller is expected to handle differently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    MalformedData,
    HeaderMismatch,
    DuplicateKey,
    Other,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::MalformedData { .. } | Error::Csv { .. } | Error::MissingKeyColumn { .. } => {
                ErrorKind::MalformedData
            }
            Error::HeaderMismatch { .. } => ErrorKind::HeaderMismatch,
            Error::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            _ => ErrorKind::Other,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::MalformedData {
            path: path.into(),
            message: message.into(),
        }
    }
}
