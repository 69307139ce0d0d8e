//! Error types for strata_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using strata_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Object not found in the store.
    #[error("object not found: {id}")]
    NotFound { id: String },

    /// Stored object file is corrupted.
    #[error("corrupt object {id}: {reason}")]
    Corrupt { id: String, reason: String },

    /// Tree body violates the entry format.
    #[error("corrupt tree: {reason}")]
    CorruptTree { reason: String },

    /// Commit body cannot be parsed.
    #[error("corrupt commit: {reason}")]
    CorruptCommit { reason: String },

    /// Malformed object id.
    #[error("invalid object id: {reason}")]
    InvalidId { reason: String },

    /// Repository is missing or not initialized.
    #[error("invalid repository at {path}: {reason}")]
    InvalidStore { path: PathBuf, reason: String },

    /// Object holds a different kind than the caller expected.
    #[error("object kind mismatch: expected {expected}, got {got}")]
    KindMismatch { expected: String, got: String },

    /// Invalid tree entry.
    #[error("invalid tree entry: {reason}")]
    InvalidEntry { reason: String },

    /// Directory nesting exceeds the snapshot recursion bound.
    #[error("directory nesting too deep at {path}")]
    TooDeep { path: PathBuf },
}

impl Error {
    /// Create a NotFound error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound { id: id.into() }
    }

    /// Create a Corrupt error.
    pub fn corrupt(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Corrupt {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a CorruptTree error.
    pub fn corrupt_tree(reason: impl Into<String>) -> Self {
        Error::CorruptTree {
            reason: reason.into(),
        }
    }

    /// Create a CorruptCommit error.
    pub fn corrupt_commit(reason: impl Into<String>) -> Self {
        Error::CorruptCommit {
            reason: reason.into(),
        }
    }

    /// Create an InvalidId error.
    pub fn invalid_id(reason: impl Into<String>) -> Self {
        Error::InvalidId {
            reason: reason.into(),
        }
    }

    /// Create an InvalidStore error.
    pub fn invalid_store(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::InvalidStore {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a KindMismatch error.
    pub fn kind_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Error::KindMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create an InvalidEntry error.
    pub fn invalid_entry(reason: impl Into<String>) -> Self {
        Error::InvalidEntry {
            reason: reason.into(),
        }
    }
}

// Additional From implementations for external error types

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io { source: err.error }
    }
}

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), io_err.to_string()),
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
            },
        }
    }
}
