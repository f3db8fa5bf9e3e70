//! Error types for kvgrid-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in kvgrid-core
#[derive(Debug, Error)]
pub enum Error {
    /// Requested table file or default resource does not exist
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Row, column or insertion position out of bounds
    #[error("invalid {what} index {index} (must be below {len})")]
    Index {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Key already present somewhere in the table
    #[error("duplicate key found: {0}")]
    DuplicateKey(String),

    /// Malformed `key,value` edit payload
    #[error("invalid format: {0}")]
    Format(String),

    /// Unrecognized edit type, sort order, or empty search term
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unique key generation gave up after too many collisions
    #[error("could not generate a unique key after {attempts} attempts")]
    KeyGenerationExhausted { attempts: usize },

    /// Failed to read a file
    #[error("failed to read file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn index(what: &'static str, index: usize, len: usize) -> Self {
        Error::Index { what, index, len }
    }
}
