//! Calendar month view of the medication schedule.
//!
//! The front end renders a month grid; this module works out where the month
//! starts in the week and which medications fall on each day, so the UI only
//! draws.

use chrono::{Datelike, NaiveDate};
use log::debug;
use shared::{DayOfWeek, ScheduleDay, ScheduleMonth};

use super::day_filter::DayFilter;
use super::errors::MedicationError;
use super::models::Medication;

#[derive(Debug, Clone, Default)]
pub struct ScheduleCalendar {
    day_filter: DayFilter,
}

impl ScheduleCalendar {
    pub fn new() -> Self {
        Self {
            day_filter: DayFilter::new(),
        }
    }

    /// Build the schedule for one month
    pub fn generate_schedule_month(
        &self,
        medications: &[Medication],
        year: i32,
        month: u32,
    ) -> Result<ScheduleMonth, MedicationError> {
        let first = self.first_of_month(year, month)?;
        let days_in_month = self.days_in_month(year, month)?;

        // Positions due on each weekday, computed once per weekday
        let positions_by_weekday: Vec<Vec<usize>> = DayOfWeek::ALL
            .iter()
            .map(|day| {
                self.day_filter
                    .medications_for_day(medications, *day)
                    .into_iter()
                    .map(|entry| entry.index)
                    .collect()
            })
            .collect();

        let days = (0..days_in_month)
            .map(|offset| {
                let date = first + chrono::Duration::days(i64::from(offset));
                let day_of_week = DayOfWeek::for_date(date);
                ScheduleDay {
                    day: date.day(),
                    day_of_week,
                    medication_positions: positions_by_weekday
                        [(day_of_week.calendar_number() - 1) as usize]
                        .clone(),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "Generated schedule for {:04}-{:02}: {} days, starting on {}",
            year,
            month,
            days.len(),
            DayOfWeek::for_date(first)
        );

        Ok(ScheduleMonth {
            year,
            month,
            first_day_of_week: DayOfWeek::for_date(first).calendar_number() - 1,
            days,
        })
    }

    /// Number of days in a month
    pub fn days_in_month(&self, year: i32, month: u32) -> Result<u32, MedicationError> {
        let first = self.first_of_month(year, month)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| invalid_month(year, month))?;
        Ok((next - first).num_days() as u32)
    }

    fn first_of_month(&self, year: i32, month: u32) -> Result<NaiveDate, MedicationError> {
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| invalid_month(year, month))
    }
}

fn invalid_month(year: i32, month: u32) -> MedicationError {
    MedicationError::InvalidDate(format!("{:04}-{:02}", year, month))
}
