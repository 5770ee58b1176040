//! Which medications are due on a given date.
//!
//! A medication is due when its recurrence days contain the date's weekday.
//! A medication with no recurrence days is never due; recurrence is opt-in,
//! not "every day" by default.

use chrono::NaiveDate;
use shared::DayOfWeek;

use super::errors::MedicationError;
use super::models::Medication;

/// A medication due on the filtered date, with its position in the full list
#[derive(Debug, Clone, Copy)]
pub struct ScheduledMedication<'a> {
    pub index: usize,
    pub medication: &'a Medication,
}

/// Stateless filter from (medications, date) to the medications due that day
#[derive(Debug, Clone, Copy, Default)]
pub struct DayFilter;

impl DayFilter {
    pub fn new() -> Self {
        Self
    }

    /// Medications due on `date`, in list order
    pub fn medications_for_date<'a>(
        &self,
        medications: &'a [Medication],
        date: NaiveDate,
    ) -> Vec<ScheduledMedication<'a>> {
        self.medications_for_day(medications, DayOfWeek::for_date(date))
    }

    /// Medications due on every `day`, in list order
    pub fn medications_for_day<'a>(
        &self,
        medications: &'a [Medication],
        day: DayOfWeek,
    ) -> Vec<ScheduledMedication<'a>> {
        medications
            .iter()
            .enumerate()
            .filter(|(_, medication)| medication.is_scheduled_on(day))
            .map(|(index, medication)| ScheduledMedication { index, medication })
            .collect()
    }

    /// Like [`DayFilter::medications_for_date`] for a year/month/day triple.
    ///
    /// Fails with `InvalidDate` when the triple is not a real calendar date.
    pub fn medications_for_ymd<'a>(
        &self,
        medications: &'a [Medication],
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<Vec<ScheduledMedication<'a>>, MedicationError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            MedicationError::InvalidDate(format!("{:04}-{:02}-{:02}", year, month, day))
        })?;
        Ok(self.medications_for_date(medications, date))
    }

    /// Parse a `YYYY-MM-DD` date
    pub fn parse_date(&self, text: &str) -> Result<NaiveDate, MedicationError> {
        NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|_| MedicationError::InvalidDate(text.to_string()))
    }
}
