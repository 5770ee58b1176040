//! # Storage Module
//!
//! Persistence for the medication list.
//!
//! The domain never touches files directly: it talks to a
//! [`MedicationRepository`], which encodes the list as JSON and hands the
//! bytes to an injected [`BlobStorage`]. Two backends exist:
//!
//! - [`FileBlobStorage`]: one file per key in the data directory, written
//!   atomically via temp file + rename
//! - [`InMemoryBlobStorage`]: a process-local map, for tests

pub mod file_storage;
pub mod medication_repository;
pub mod memory_storage;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use file_storage::{validate_key, FileBlobStorage};
pub use medication_repository::{MedicationRepository, DEFAULT_STORAGE_KEY};
pub use memory_storage::InMemoryBlobStorage;
pub use traits::BlobStorage;
