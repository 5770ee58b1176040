//! # Storage Traits
//!
//! The key-value blob primitive the medication repository persists through.
//! Implementations decide where the bytes live (a data directory on disk, an
//! in-memory map for tests); the repository decides what the bytes mean.

use crate::domain::errors::PersistenceError;

/// Get/set of opaque byte blobs by a fixed key
pub trait BlobStorage: Send + Sync {
    /// Read the blob stored under `key`, `None` if nothing was ever written
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Replace the blob stored under `key`.
    ///
    /// Readers must never observe a partially written value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError>;
}
