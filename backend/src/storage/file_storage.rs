//! # File Blob Storage
//!
//! Stores each slot as a file in the data directory.
//!
//! ```text
//! data/
//! ├── medimanage.yaml     (optional configuration)
//! └── medications.json    ← one file per storage key
//! ```
//!
//! Writes go to a temporary file that is then renamed over the slot, so a
//! crash mid-write leaves the previous contents intact.

use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::traits::BlobStorage;
use crate::domain::errors::PersistenceError;

/// Blob storage rooted at a data directory
#[derive(Debug, Clone)]
pub struct FileBlobStorage {
    base_directory: PathBuf,
}

impl FileBlobStorage {
    /// Open storage in `base_directory`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> io::Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// File backing the slot `key`
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        validate_key(key)?;
        Ok(self.base_directory.join(format!("{}.json", key)))
    }
}

/// Check that `key` names a file inside the data directory: non-empty, only
/// ASCII letters, digits, `_`, `-` and `.`, and no leading `.`
pub fn validate_key(key: &str) -> Result<(), PersistenceError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidKey(key.to_string()))
    }
}

impl BlobStorage for FileBlobStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let path = self.slot_path(key)?;

        match fs::read(&path) {
            Ok(bytes) => {
                debug!("Read {} bytes from {:?}", bytes.len(), path);
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored data at {:?}", path);
                Ok(None)
            }
            Err(source) => Err(PersistenceError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
        let path = self.slot_path(key)?;
        let write_error = |source: io::Error| PersistenceError::Write {
            key: key.to_string(),
            source,
        };

        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory).map_err(write_error)?;
        }

        // Write to a temp file, then rename over the slot
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).map_err(write_error)?;
        fs::rename(&temp_path, &path).map_err(write_error)?;

        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}
