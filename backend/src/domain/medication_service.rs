use chrono::NaiveDate;
use log::{info, warn};
use shared::ScheduleMonth;
use std::sync::Arc;

use super::clock::Clock;
use super::commands::{
    CreateMedicationCommand, DeleteMedicationCommand, MedicationMutationResult,
    UpdateMedicationCommand,
};
use super::day_filter::{DayFilter, ScheduledMedication};
use super::errors::MedicationError;
use super::medication_store::MedicationStore;
use super::models::Medication;
use super::schedule_calendar::ScheduleCalendar;

/// Entry point for front ends: validates commands, applies them to the
/// store, and answers schedule queries
pub struct MedicationService {
    store: MedicationStore,
    day_filter: DayFilter,
    calendar: ScheduleCalendar,
    clock: Arc<dyn Clock>,
}

impl MedicationService {
    pub fn new(store: MedicationStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            day_filter: DayFilter::new(),
            calendar: ScheduleCalendar::new(),
            clock,
        }
    }

    pub fn store_mut(&mut self) -> &mut MedicationStore {
        &mut self.store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Validate and append a new medication
    pub fn create_medication(
        &mut self,
        command: CreateMedicationCommand,
    ) -> Result<MedicationMutationResult, MedicationError> {
        let medication = Medication::new(
            command.name,
            command.dosage,
            command.time_of_day,
            command.days,
        )?;

        let index = self.store.add(medication.clone());
        info!("Created medication '{}' at position {}", medication.name(), index);

        Ok(self.mutation_result(index, medication))
    }

    /// Validate the merged values, then replace the medication in place.
    ///
    /// Nothing is changed if the index is out of range or validation fails.
    pub fn update_medication(
        &mut self,
        command: UpdateMedicationCommand,
    ) -> Result<MedicationMutationResult, MedicationError> {
        let index = command.index;
        let existing = self
            .store
            .get(index)
            .ok_or(MedicationError::IndexOutOfRange {
                index,
                len: self.store.len(),
            })?;

        let replacement = Medication::new(
            command.name.unwrap_or_else(|| existing.name().to_string()),
            command.dosage.unwrap_or_else(|| existing.dosage().to_string()),
            command.time_of_day.unwrap_or_else(|| existing.time_of_day()),
            command
                .days
                .unwrap_or_else(|| existing.recurrence_days().as_slice().to_vec()),
        )?;

        self.store.update(index, replacement.clone())?;
        Ok(self.mutation_result(index, replacement))
    }

    /// Remove the medication at a position in the full list
    pub fn delete_medication(
        &mut self,
        command: DeleteMedicationCommand,
    ) -> Result<MedicationMutationResult, MedicationError> {
        let removed = self.store.remove(command.index)?;
        Ok(self.mutation_result(command.index, removed))
    }

    pub fn list_medications(&self) -> &[Medication] {
        self.store.medications()
    }

    /// Medications due on `date`, in list order
    pub fn medications_for_date(&self, date: NaiveDate) -> Vec<ScheduledMedication<'_>> {
        self.day_filter
            .medications_for_date(self.store.medications(), date)
    }

    /// Medications due on a `YYYY-MM-DD` date
    pub fn medications_for_date_str(
        &self,
        date: &str,
    ) -> Result<(NaiveDate, Vec<ScheduledMedication<'_>>), MedicationError> {
        let date = self.day_filter.parse_date(date)?;
        Ok((date, self.medications_for_date(date)))
    }

    /// Medications due today according to the service clock
    pub fn medications_for_today(&self) -> (NaiveDate, Vec<ScheduledMedication<'_>>) {
        let today = self.clock.today();
        (today, self.medications_for_date(today))
    }

    pub fn schedule_month(&self, year: i32, month: u32) -> Result<ScheduleMonth, MedicationError> {
        self.calendar
            .generate_schedule_month(self.store.medications(), year, month)
    }

    fn mutation_result(&self, index: usize, medication: Medication) -> MedicationMutationResult {
        let flush_error = self.store.last_flush_error().map(|e| e.to_string());
        if let Some(message) = &flush_error {
            warn!("Change to '{}' is not saved: {}", medication.name(), message);
        }
        MedicationMutationResult {
            index,
            medication,
            flush_error,
        }
    }
}
