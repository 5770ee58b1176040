use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use shared::{
    CreateMedicationRequest, DayOfWeek, DayScheduleRequest, DayScheduleResponse,
    DeleteMedicationRequest, MedicationListResponse, ScheduleMonthRequest,
    UpdateMedicationRequest,
};
use std::io::Write;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::domain::{MedicationError, MedicationService};
use crate::io::mappers::MedicationMapper;
use crate::io::output::Output;

#[derive(Parser, Debug, Clone)]
#[command(name = "medimanage", version, about = "Medication reminders")]
pub struct Cli {
    /// Directory holding the medication list (overrides config and environment)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: medimanage.yaml in the data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a medication.
    Add {
        name: String,
        dosage: String,
        /// Time of day, HH:MM
        #[arg(long)]
        time: String,
        #[command(flatten)]
        days: DaySelection,
    },

    /// Edit the medication at a position; omitted fields are unchanged.
    Edit {
        position: usize,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        dosage: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[command(flatten)]
        days: DaySelection,
    },

    /// Remove the medication at a position.
    Remove { position: usize },

    /// List every medication with its position.
    List,

    /// Medications due on a date (default: today).
    Day {
        /// YYYY-MM-DD
        date: Option<String>,
    },

    /// Month calendar of due days (default: this month).
    Month {
        /// YYYY-MM
        month: Option<String>,
    },

    /// Print the effective configuration.
    Config,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DaySelection {
    /// Comma-separated days, e.g. mon,wed,fri
    #[arg(long, value_delimiter = ',', conflicts_with = "daily")]
    pub days: Vec<DayOfWeek>,

    /// Every day of the week
    #[arg(long)]
    pub daily: bool,
}

impl DaySelection {
    /// The chosen days, or `None` when neither flag was given
    pub fn resolve(self) -> Option<Vec<DayOfWeek>> {
        if self.daily {
            Some(DayOfWeek::ALL.to_vec())
        } else if self.days.is_empty() {
            None
        } else {
            Some(self.days)
        }
    }
}

/// Parse `YYYY-MM`
pub fn parse_year_month(text: &str) -> Result<ScheduleMonthRequest, MedicationError> {
    NaiveDate::parse_from_str(&format!("{}-01", text.trim()), "%Y-%m-%d")
        .map(|first| ScheduleMonthRequest {
            year: first.year(),
            month: first.month(),
        })
        .map_err(|_| MedicationError::InvalidDate(text.to_string()))
}

/// Medications due on the requested day, with positions in the full list
pub fn day_schedule(
    service: &MedicationService,
    request: DayScheduleRequest,
) -> Result<DayScheduleResponse, MedicationError> {
    let (date, due) = match request.date.as_deref() {
        Some(text) => service.medications_for_date_str(text)?,
        None => service.medications_for_today(),
    };
    Ok(DayScheduleResponse {
        date: date.format("%Y-%m-%d").to_string(),
        day_of_week: DayOfWeek::for_date(date),
        medications: due.iter().map(MedicationMapper::scheduled_to_dto).collect(),
    })
}

pub fn run<W: Write>(
    command: Command,
    config: &AppConfig,
    service: &mut MedicationService,
    output: Output,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Add {
            name,
            dosage,
            time,
            days,
        } => {
            let request = CreateMedicationRequest {
                name,
                dosage,
                time_of_day: time,
                days: days.resolve().unwrap_or_default(),
            };
            let result = service.create_medication(MedicationMapper::to_create_command(request)?)?;
            output.mutation(out, &MedicationMapper::to_mutation_response(result, "Medication added"))
        }
        Command::Edit {
            position,
            name,
            dosage,
            time,
            days,
        } => {
            let request = UpdateMedicationRequest {
                position,
                name,
                dosage,
                time_of_day: time,
                days: days.resolve(),
            };
            let result = service.update_medication(MedicationMapper::to_update_command(request)?)?;
            output.mutation(out, &MedicationMapper::to_mutation_response(result, "Medication updated"))
        }
        Command::Remove { position } => {
            let command = MedicationMapper::to_delete_command(DeleteMedicationRequest { position });
            let result = service.delete_medication(command)?;
            output.mutation(out, &MedicationMapper::to_mutation_response(result, "Medication removed"))
        }
        Command::List => {
            let response = MedicationListResponse {
                medications: MedicationMapper::list_to_dto(service.list_medications()),
            };
            output.list(out, &response)
        }
        Command::Day { date } => {
            let response = day_schedule(service, DayScheduleRequest { date })?;
            output.day_schedule(out, &response)
        }
        Command::Month { month } => {
            let request = match month {
                Some(text) => parse_year_month(&text)?,
                None => {
                    let today = service.clock().today();
                    ScheduleMonthRequest {
                        year: today.year(),
                        month: today.month(),
                    }
                }
            };
            let month = service.schedule_month(request.year, request.month)?;
            output.schedule_month(out, &month)
        }
        Command::Config => output.text(out, &config.to_yaml()?, config),
    }
}
