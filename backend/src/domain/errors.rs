//! Error types shared by the domain and storage layers.

use std::io;

use super::models::ValidationError;

/// Failure to read or write the persisted medication slot.
///
/// Never fatal to a mutation: the in-memory list stays authoritative and the
/// error is logged and reported alongside the result.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to serialize medications: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to read storage slot '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write storage slot '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Errors returned by medication operations
#[derive(Debug, thiserror::Error)]
pub enum MedicationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No medication at position {index} (the list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),
}
