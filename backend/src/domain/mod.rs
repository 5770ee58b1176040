//! # Domain Module
//!
//! Medication scheduling rules, independent of any front end or storage
//! backend.
//!
//! ## Module Organization
//!
//! - **models**: `Medication`, `RecurrenceDays` and write-path validation
//! - **medication_store**: the authoritative in-memory list, flushed to
//!   storage after every change
//! - **day_filter**: which medications are due on a date
//! - **schedule_calendar**: month views built on the day filter
//! - **medication_service**: command handling for front ends
//! - **clock**: the wall-clock collaborator
//!
//! ## Business Rules
//!
//! - Name and dosage must be non-blank and at least one day must be selected
//!   when adding or editing
//! - Stored data is read tolerantly: bad times fall back to "now", unknown
//!   days are dropped, and a record left with no days is kept as-is
//! - A medication with no days is never due
//! - Two medications are equal when name and dosage match

pub mod clock;
pub mod commands;
pub mod day_filter;
pub mod errors;
pub mod medication_service;
pub mod medication_store;
pub mod models;
pub mod schedule_calendar;

pub use clock::{Clock, FixedClock, SystemClock};
pub use commands::*;
pub use day_filter::{DayFilter, ScheduledMedication};
pub use errors::{MedicationError, PersistenceError};
pub use medication_service::MedicationService;
pub use medication_store::{MedicationStore, StoreEvent};
pub use models::{Medication, RecurrenceDays, ValidationError};
pub use schedule_calendar::ScheduleCalendar;
