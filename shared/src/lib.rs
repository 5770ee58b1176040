use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week a medication can recur on.
///
/// Serialized as the lowercase English name (`"monday"`), which is also the
/// persisted tag format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// All seven days in calendar order, Sunday first
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Fixed, locale-independent calendar number (Sunday = 1, ..., Saturday = 7)
    pub fn calendar_number(self) -> u32 {
        match self {
            DayOfWeek::Sunday => 1,
            DayOfWeek::Monday => 2,
            DayOfWeek::Tuesday => 3,
            DayOfWeek::Wednesday => 4,
            DayOfWeek::Thursday => 5,
            DayOfWeek::Friday => 6,
            DayOfWeek::Saturday => 7,
        }
    }

    /// Weekday of a concrete calendar date
    pub fn for_date(date: NaiveDate) -> Self {
        // number_from_sunday() is 1-based with Sunday = 1, same as ours
        Self::ALL[(date.weekday().number_from_sunday() - 1) as usize]
    }

    /// Lowercase tag used on the wire and in storage
    pub fn as_tag(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "sunday",
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
        }
    }

    /// Strict tag lookup: only the exact lowercase names are recognized
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.as_tag() == tag)
    }

    /// Short display name ("Mon")
    pub fn short_name(self) -> &'static str {
        &self.display_name()[..3]
    }

    /// Capitalized display name ("Monday")
    pub fn display_name(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when user input does not name a weekday
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDayOfWeekError(pub String);

impl fmt::Display for ParseDayOfWeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a day of the week", self.0)
    }
}

impl std::error::Error for ParseDayOfWeekError {}

impl FromStr for DayOfWeek {
    type Err = ParseDayOfWeekError;

    /// Lenient parsing for user input: case-insensitive, full or
    /// three-letter names ("Mon", "monday", "MONDAY")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| day.as_tag() == needle || day.as_tag()[..3] == needle)
            .ok_or_else(|| ParseDayOfWeekError(s.to_string()))
    }
}

/// A medication as presented to the front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    /// Zero-based position in the full medication list
    pub position: usize,
    pub name: String,
    pub dosage: String,
    /// Time of day, formatted `HH:MM`
    pub time_of_day: String,
    /// Recurrence days in the order they were selected
    pub days: Vec<DayOfWeek>,
}

/// Request to register a new medication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMedicationRequest {
    pub name: String,
    pub dosage: String,
    /// Time of day, `HH:MM` or `HH:MM:SS`
    pub time_of_day: String,
    pub days: Vec<DayOfWeek>,
}

/// Request to edit the medication at `position`
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMedicationRequest {
    pub position: usize,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub time_of_day: Option<String>,
    pub days: Option<Vec<DayOfWeek>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteMedicationRequest {
    pub position: usize,
}

/// Response for add, edit and delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationMutationResponse {
    /// The medication after the change (the removed one for deletes)
    pub medication: Medication,
    pub success_message: String,
    /// Set when the change is in memory but could not be written to storage
    pub flush_warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationListResponse {
    pub medications: Vec<Medication>,
}

/// Request for the medications scheduled on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScheduleRequest {
    /// `YYYY-MM-DD`; today when absent
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScheduleResponse {
    /// `YYYY-MM-DD`
    pub date: String,
    pub day_of_week: DayOfWeek,
    pub medications: Vec<Medication>,
}

/// Request for a calendar month of schedules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMonthRequest {
    pub year: i32,
    pub month: u32,
}

/// A calendar month with the medications scheduled on each day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMonth {
    pub year: i32,
    pub month: u32,
    /// Number of padding cells before day 1 (0 = month starts on Sunday)
    pub first_day_of_week: u32,
    pub days: Vec<ScheduleDay>,
}

/// One day of a [`ScheduleMonth`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub day: u32,
    pub day_of_week: DayOfWeek,
    /// Positions (in the full medication list) of medications due that day
    pub medication_positions: Vec<usize>,
}
