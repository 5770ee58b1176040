pub mod medication;

pub use medication::{parse_time_of_day, Medication, RecurrenceDays, ValidationError};
