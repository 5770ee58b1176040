//! Domain model for a medication and its weekly recurrence.
use chrono::{NaiveTime, Timelike};
use shared::DayOfWeek;

/// Weekdays a medication is taken on.
///
/// Behaves as a set (no duplicates, order-insensitive equality) but keeps
/// insertion order so the days display in the order they were picked.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceDays {
    days: Vec<DayOfWeek>,
}

impl RecurrenceDays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every day of the week, Sunday first ("Daily")
    pub fn all() -> Self {
        Self {
            days: DayOfWeek::ALL.to_vec(),
        }
    }

    /// Add a day; returns false if it was already present
    pub fn insert(&mut self, day: DayOfWeek) -> bool {
        if self.days.contains(&day) {
            return false;
        }
        self.days.push(day);
        true
    }

    /// Remove a day; returns false if it was not present
    pub fn remove(&mut self, day: DayOfWeek) -> bool {
        match self.days.iter().position(|d| *d == day) {
            Some(index) => {
                self.days.remove(index);
                true
            }
            None => false,
        }
    }

    /// Flip a day's selection; returns whether the day is now selected
    pub fn toggle(&mut self, day: DayOfWeek) -> bool {
        if self.remove(day) {
            false
        } else {
            self.days.push(day);
            true
        }
    }

    /// Deselect every day
    pub fn clear(&mut self) {
        self.days.clear();
    }

    pub fn contains(&self, day: DayOfWeek) -> bool {
        self.days.contains(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = DayOfWeek> + '_ {
        self.days.iter().copied()
    }

    pub fn as_slice(&self) -> &[DayOfWeek] {
        &self.days
    }

    pub fn is_every_day(&self) -> bool {
        self.days.len() == DayOfWeek::ALL.len()
    }
}

impl PartialEq for RecurrenceDays {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|day| other.contains(day))
    }
}

impl Eq for RecurrenceDays {}

impl FromIterator<DayOfWeek> for RecurrenceDays {
    fn from_iter<I: IntoIterator<Item = DayOfWeek>>(iter: I) -> Self {
        let mut days = RecurrenceDays::new();
        for day in iter {
            days.insert(day);
        }
        days
    }
}

impl From<Vec<DayOfWeek>> for RecurrenceDays {
    fn from(days: Vec<DayOfWeek>) -> Self {
        days.into_iter().collect()
    }
}

impl From<&[DayOfWeek]> for RecurrenceDays {
    fn from(days: &[DayOfWeek]) -> Self {
        days.iter().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Medication name cannot be empty")]
    EmptyName,
    #[error("Dosage cannot be empty")]
    EmptyDosage,
    #[error("Select at least one day for the medication")]
    NoRecurrenceDays,
}

/// A medication record.
///
/// Equality (`==`) compares name and dosage only, so two entries for the same
/// drug and strength are "equal" even on different schedules. Use
/// [`Medication::strictly_equals`] to compare all four fields.
#[derive(Debug, Clone)]
pub struct Medication {
    name: String,
    dosage: String,
    time_of_day: NaiveTime,
    recurrence_days: RecurrenceDays,
}

impl Medication {
    /// Build a validated medication.
    ///
    /// Name and dosage are trimmed and must be non-empty, and at least one
    /// recurrence day is required. The time is kept to minute precision.
    pub fn new(
        name: impl Into<String>,
        dosage: impl Into<String>,
        time_of_day: NaiveTime,
        recurrence_days: impl Into<RecurrenceDays>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        let dosage = dosage.into().trim().to_string();
        let recurrence_days = recurrence_days.into();

        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if dosage.is_empty() {
            return Err(ValidationError::EmptyDosage);
        }
        if recurrence_days.is_empty() {
            return Err(ValidationError::NoRecurrenceDays);
        }

        Ok(Self::restored(name, dosage, time_of_day, recurrence_days))
    }

    /// Rebuild a medication read back from storage without write-path checks.
    /// A stored record whose days were all unrecognized keeps an empty set.
    pub(crate) fn restored(
        name: String,
        dosage: String,
        time_of_day: NaiveTime,
        recurrence_days: RecurrenceDays,
    ) -> Self {
        Self {
            name,
            dosage,
            time_of_day: truncate_to_minute(time_of_day),
            recurrence_days,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dosage(&self) -> &str {
        &self.dosage
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.time_of_day
    }

    pub fn recurrence_days(&self) -> &RecurrenceDays {
        &self.recurrence_days
    }

    /// Whether this medication is taken on `day`
    pub fn is_scheduled_on(&self, day: DayOfWeek) -> bool {
        self.recurrence_days.contains(day)
    }

    /// Overwrite all four fields with those of `replacement`, in place
    pub fn replace_with(&mut self, replacement: Medication) {
        self.name = replacement.name;
        self.dosage = replacement.dosage;
        self.time_of_day = replacement.time_of_day;
        self.recurrence_days = replacement.recurrence_days;
    }

    /// Field-by-field equality including time and recurrence days
    pub fn strictly_equals(&self, other: &Medication) -> bool {
        self == other
            && self.time_of_day == other.time_of_day
            && self.recurrence_days == other.recurrence_days
    }
}

impl PartialEq for Medication {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.dosage == other.dosage
    }
}

impl Eq for Medication {}

/// Parse a user-entered or stored time of day, `HH:MM` or `HH:MM:SS`
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .ok()
}

/// Drop seconds and sub-second precision
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_new_trims_and_validates() {
        let med = Medication::new("  Aspirin ", " 100mg", at(8, 0), vec![DayOfWeek::Monday]).unwrap();
        assert_eq!(med.name(), "Aspirin");
        assert_eq!(med.dosage(), "100mg");

        assert_eq!(
            Medication::new("   ", "100mg", at(8, 0), vec![DayOfWeek::Monday]).unwrap_err(),
            ValidationError::EmptyName
        );
        assert_eq!(
            Medication::new("Aspirin", "\t", at(8, 0), vec![DayOfWeek::Monday]).unwrap_err(),
            ValidationError::EmptyDosage
        );
        assert_eq!(
            Medication::new("Aspirin", "100mg", at(8, 0), Vec::new()).unwrap_err(),
            ValidationError::NoRecurrenceDays
        );
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("08:00"), Some(at(8, 0)));
        assert_eq!(parse_time_of_day(" 21:15 "), Some(at(21, 15)));
        assert_eq!(
            parse_time_of_day("06:05:30"),
            NaiveTime::from_hms_opt(6, 5, 30)
        );
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("breakfast"), None);
    }

    #[test]
    fn test_time_is_kept_to_the_minute() {
        let precise = NaiveTime::from_hms_milli_opt(8, 30, 45, 250).unwrap();
        let med = Medication::new("Aspirin", "100mg", precise, vec![DayOfWeek::Monday]).unwrap();
        assert_eq!(med.time_of_day(), at(8, 30));
    }

    #[test]
    fn test_equality_ignores_time_and_days() {
        let morning = Medication::new("Aspirin", "100mg", at(8, 0), vec![DayOfWeek::Monday]).unwrap();
        let evening = Medication::new("Aspirin", "100mg", at(20, 0), vec![DayOfWeek::Friday]).unwrap();
        let stronger = Medication::new("Aspirin", "300mg", at(8, 0), vec![DayOfWeek::Monday]).unwrap();

        assert_eq!(morning, evening);
        assert!(!morning.strictly_equals(&evening));
        assert_ne!(morning, stronger);
    }

    #[test]
    fn test_strict_equality_treats_days_as_a_set() {
        let a = Medication::new("Aspirin", "100mg", at(8, 0), vec![DayOfWeek::Monday, DayOfWeek::Friday]).unwrap();
        let b = Medication::new("Aspirin", "100mg", at(8, 0), vec![DayOfWeek::Friday, DayOfWeek::Monday]).unwrap();
        assert!(a.strictly_equals(&b));
    }

    #[test]
    fn test_recurrence_days_dedupe_and_keep_order() {
        let days: RecurrenceDays = vec![
            DayOfWeek::Friday,
            DayOfWeek::Monday,
            DayOfWeek::Friday,
        ]
        .into();
        assert_eq!(days.as_slice(), &[DayOfWeek::Friday, DayOfWeek::Monday]);
    }

    #[test]
    fn test_recurrence_day_selection_helpers() {
        let mut days = RecurrenceDays::new();
        assert!(days.toggle(DayOfWeek::Tuesday));
        assert!(days.contains(DayOfWeek::Tuesday));
        assert!(!days.toggle(DayOfWeek::Tuesday));
        assert!(days.is_empty());

        let mut every = RecurrenceDays::all();
        assert!(every.is_every_day());
        assert!(!every.insert(DayOfWeek::Monday));
        assert!(every.remove(DayOfWeek::Monday));
        assert_eq!(every.len(), 6);
        every.clear();
        assert!(every.is_empty());
    }

    #[test]
    fn test_replace_with_overwrites_all_fields() {
        let mut med = Medication::new("Aspirin", "100mg", at(8, 0), vec![DayOfWeek::Monday]).unwrap();
        let replacement = Medication::new("Ibuprofen", "200mg", at(21, 15), RecurrenceDays::all()).unwrap();
        med.replace_with(replacement.clone());
        assert!(med.strictly_equals(&replacement));
    }
}
