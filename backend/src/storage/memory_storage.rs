//! In-process blob storage, for tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::BlobStorage;
use crate::domain::errors::PersistenceError;

#[derive(Debug, Default)]
pub struct InMemoryBlobStorage {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one slot
    pub fn with_slot(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let storage = Self::new();
        storage.slots_mut().insert(key.to_string(), value.into());
        storage
    }

    fn slots_mut(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BlobStorage for InMemoryBlobStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.slots_mut().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
        self.slots_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_independent() {
        let storage = InMemoryBlobStorage::with_slot("medications", "[]");
        storage.set("other", b"{}").unwrap();

        assert_eq!(storage.get("medications").unwrap().unwrap(), b"[]");
        assert_eq!(storage.get("other").unwrap().unwrap(), b"{}");
        assert!(storage.get("missing").unwrap().is_none());
    }
}
