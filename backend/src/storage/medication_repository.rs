//! # Medication Repository
//!
//! Reads and writes the medication list as one JSON document in a single
//! storage slot (key `medications` by default).
//!
//! ## Format
//!
//! ```json
//! [
//!   {
//!     "name": "Aspirin",
//!     "dosage": "100mg",
//!     "timeOfDay": "08:00",
//!     "selectedDaysOfWeek": ["monday", "wednesday", "friday"]
//!   }
//! ]
//! ```
//!
//! ## Reading is tolerant
//!
//! - A missing, unreadable or malformed slot loads as an empty list.
//! - `timeOfDay` may be absent, `null`, `"HH:MM"`, `"HH:MM:SS"`, an RFC 3339
//!   timestamp, or a number of seconds since 2001-01-01T00:00:00Z (the
//!   format older app versions wrote). Anything unusable becomes the current
//!   clock time.
//! - Unknown weekday strings are dropped; the rest of the record is kept,
//!   even if that leaves it with no days at all.

use chrono::{DateTime, Local, NaiveTime, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::DayOfWeek;
use std::sync::Arc;

use super::traits::BlobStorage;
use crate::domain::clock::Clock;
use crate::domain::errors::PersistenceError;
use crate::domain::models::{parse_time_of_day, Medication, RecurrenceDays};

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "medications";

/// Seconds from the Unix epoch to 2001-01-01T00:00:00Z
const REFERENCE_DATE_UNIX_OFFSET: i64 = 978_307_200;

/// Record layout as written
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredMedicationRef<'a> {
    name: &'a str,
    dosage: &'a str,
    time_of_day: String,
    selected_days_of_week: Vec<&'static str>,
}

impl<'a> From<&'a Medication> for StoredMedicationRef<'a> {
    fn from(medication: &'a Medication) -> Self {
        Self {
            name: medication.name(),
            dosage: medication.dosage(),
            time_of_day: medication.time_of_day().format("%H:%M").to_string(),
            selected_days_of_week: medication
                .recurrence_days()
                .iter()
                .map(DayOfWeek::as_tag)
                .collect(),
        }
    }
}

/// Record layout as read; optional fields are checked by hand
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMedication {
    name: String,
    dosage: String,
    #[serde(default)]
    time_of_day: Option<Value>,
    #[serde(default)]
    selected_days_of_week: Option<Vec<String>>,
}

impl StoredMedication {
    fn into_domain(self, clock: &dyn Clock) -> Medication {
        let name = self.name;

        let time_of_day = match self.time_of_day.as_ref().and_then(parse_stored_time) {
            Some(time) => time,
            None => {
                debug!(
                    "Medication '{}' has no usable timeOfDay ({:?}); using the current time",
                    name, self.time_of_day
                );
                clock.time_now()
            }
        };

        let recurrence_days: RecurrenceDays = self
            .selected_days_of_week
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| {
                let day = DayOfWeek::from_tag(&tag);
                if day.is_none() {
                    warn!("Dropping unknown weekday '{}' from medication '{}'", tag, name);
                }
                day
            })
            .collect();

        Medication::restored(name, self.dosage, time_of_day, recurrence_days)
    }
}

fn parse_stored_time(value: &Value) -> Option<NaiveTime> {
    match value {
        Value::String(text) => parse_time_of_day(text).or_else(|| {
            DateTime::parse_from_rfc3339(text.trim())
                .ok()
                .map(|timestamp| timestamp.time())
        }),
        Value::Number(number) => number.as_f64().and_then(reference_seconds_to_local_time),
        _ => None,
    }
}

/// Local time of day for a count of seconds since 2001-01-01T00:00:00Z
fn reference_seconds_to_local_time(seconds: f64) -> Option<NaiveTime> {
    if !seconds.is_finite() {
        return None;
    }
    let unix_seconds = (seconds.floor() as i64).checked_add(REFERENCE_DATE_UNIX_OFFSET)?;
    DateTime::<Utc>::from_timestamp(unix_seconds, 0).map(|utc| utc.with_timezone(&Local).time())
}

/// JSON codec for the medication slot
#[derive(Clone)]
pub struct MedicationRepository {
    storage: Arc<dyn BlobStorage>,
    key: String,
}

impl MedicationRepository {
    pub fn new(storage: Arc<dyn BlobStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Repository on the default `medications` slot
    pub fn with_default_key(storage: Arc<dyn BlobStorage>) -> Self {
        Self::new(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored list. Never fails: unusable data loads as empty.
    pub fn load(&self, clock: &dyn Clock) -> Vec<Medication> {
        let bytes = match self.storage.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!("No saved medications under '{}'; starting empty", self.key);
                return Vec::new();
            }
            Err(e) => {
                error!("{}; starting with an empty medication list", e);
                return Vec::new();
            }
        };

        let records: Vec<StoredMedication> = match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Saved medications under '{}' are malformed ({}); starting empty",
                    self.key, e
                );
                return Vec::new();
            }
        };

        let medications: Vec<Medication> = records
            .into_iter()
            .map(|record| record.into_domain(clock))
            .collect();

        info!("Loaded {} medications from '{}'", medications.len(), self.key);
        medications
    }

    /// Overwrite the slot with the full list
    pub fn save(&self, medications: &[Medication]) -> Result<(), PersistenceError> {
        let records: Vec<StoredMedicationRef<'_>> =
            medications.iter().map(StoredMedicationRef::from).collect();
        let bytes = serde_json::to_vec_pretty(&records)?;

        self.storage.set(&self.key, &bytes)?;
        debug!("Saved {} medications to '{}'", medications.len(), self.key);
        Ok(())
    }
}
