//! Domain-level command and result types.
//!
//! Used by [`MedicationService`](super::MedicationService); the front end maps
//! the public DTOs from the `shared` crate onto these.

use chrono::NaiveTime;
use shared::DayOfWeek;

use super::models::Medication;

/// Input for registering a new medication
#[derive(Debug, Clone)]
pub struct CreateMedicationCommand {
    pub name: String,
    pub dosage: String,
    pub time_of_day: NaiveTime,
    pub days: Vec<DayOfWeek>,
}

/// Input for editing the medication at `index`; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UpdateMedicationCommand {
    pub index: usize,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub time_of_day: Option<NaiveTime>,
    pub days: Option<Vec<DayOfWeek>>,
}

#[derive(Debug, Clone)]
pub struct DeleteMedicationCommand {
    pub index: usize,
}

/// Outcome of an add, edit or delete
#[derive(Debug, Clone)]
pub struct MedicationMutationResult {
    pub index: usize,
    /// The medication after the change; for deletes, the removed one
    pub medication: Medication,
    /// Present when the change could not be written to storage
    pub flush_error: Option<String>,
}
