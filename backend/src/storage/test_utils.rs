/// Test utilities shared by the storage and domain tests
///
/// `TestEnvironment` owns a temporary data directory that is removed when it
/// is dropped, even if the test panics.
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use shared::DayOfWeek;
use tempfile::TempDir;

use super::file_storage::FileBlobStorage;
use super::traits::BlobStorage;
use crate::domain::clock::FixedClock;
use crate::domain::errors::PersistenceError;
use crate::domain::models::{Medication, RecurrenceDays};

/// RAII test environment around a temporary data directory
pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub storage: Arc<FileBlobStorage>,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> io::Result<Self> {
        let temp_dir = TempDir::with_prefix("medimanage_test_")?;
        let base_path = temp_dir.path().to_path_buf();
        let storage = Arc::new(FileBlobStorage::new(&base_path)?);

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            storage,
            base_path,
        })
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("MEDIMANAGE_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}

/// Storage whose reads and writes always fail
#[derive(Debug, Default)]
pub struct FailingStorage;

impl FailingStorage {
    pub fn new() -> Self {
        Self
    }
}

impl BlobStorage for FailingStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        Err(PersistenceError::Read {
            key: key.to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read denied"),
        })
    }

    fn set(&self, key: &str, _value: &[u8]) -> Result<(), PersistenceError> {
        Err(PersistenceError::Write {
            key: key.to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "disk is read-only"),
        })
    }
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Clock fixed at 2025-06-02 12:00, a Monday
pub fn fixed_clock() -> FixedClock {
    FixedClock::at(date(2025, 6, 2), 12, 0).expect("valid clock")
}

/// Aspirin, 100mg, 08:00 on Monday/Wednesday/Friday
pub fn aspirin() -> Medication {
    Medication::new(
        "Aspirin",
        "100mg",
        at(8, 0),
        vec![DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Friday],
    )
    .expect("valid medication")
}

/// Vitamin D, 1000IU, 09:00 with no recurrence days, as only a load can produce
pub fn unscheduled_vitamin_d() -> Medication {
    Medication::restored(
        "Vitamin D".to_string(),
        "1000IU".to_string(),
        at(9, 0),
        RecurrenceDays::new(),
    )
}

pub fn daily(name: &str, dosage: &str, time: NaiveTime) -> Medication {
    Medication::new(name, dosage, time, RecurrenceDays::all()).expect("valid medication")
}
