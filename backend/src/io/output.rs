//! Rendering of command results, as plain text or JSON.

use anyhow::Result;
use serde::Serialize;
use shared::{
    DayOfWeek, DayScheduleResponse, Medication, MedicationListResponse,
    MedicationMutationResponse, ScheduleMonth,
};
use std::io::Write;

#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn mutation<W: Write>(&self, out: &mut W, response: &MedicationMutationResponse) -> Result<()> {
        if self.json {
            return write_json(out, response);
        }
        writeln!(out, "{}", response.success_message)?;
        write_medication_line(out, &response.medication)?;
        if let Some(warning) = &response.flush_warning {
            writeln!(out, "warning: not saved to storage: {}", warning)?;
        }
        Ok(())
    }

    pub fn list<W: Write>(&self, out: &mut W, response: &MedicationListResponse) -> Result<()> {
        if self.json {
            return write_json(out, response);
        }
        if response.medications.is_empty() {
            writeln!(out, "No medications yet.")?;
        }
        for medication in &response.medications {
            write_medication_line(out, medication)?;
        }
        Ok(())
    }

    pub fn day_schedule<W: Write>(&self, out: &mut W, response: &DayScheduleResponse) -> Result<()> {
        if self.json {
            return write_json(out, response);
        }
        writeln!(out, "{} ({})", response.date, response.day_of_week)?;
        if response.medications.is_empty() {
            writeln!(out, "No medications for this day.")?;
        }
        for medication in &response.medications {
            write_medication_line(out, medication)?;
        }
        Ok(())
    }

    pub fn schedule_month<W: Write>(&self, out: &mut W, month: &ScheduleMonth) -> Result<()> {
        if self.json {
            return write_json(out, month);
        }
        writeln!(out, "{:04}-{:02}", month.year, month.month)?;

        let header: Vec<&str> = DayOfWeek::ALL.iter().map(|day| day.short_name()).collect();
        writeln!(out, "{}", header.join("  "))?;

        // Cells are three wide to line up with the day headers
        let mut cells: Vec<String> = vec![String::from("   "); month.first_day_of_week as usize];
        cells.extend(month.days.iter().map(|day| {
            if day.medication_positions.is_empty() {
                format!("{:>3}", day.day)
            } else {
                format!("{:>2}*", day.day)
            }
        }));
        for week in cells.chunks(7) {
            writeln!(out, "{}", week.join("  ").trim_end())?;
        }
        writeln!(out, "* = medications scheduled")?;
        Ok(())
    }

    pub fn text<W: Write, T: Serialize>(&self, out: &mut W, text: &str, value: &T) -> Result<()> {
        if self.json {
            return write_json(out, value);
        }
        write!(out, "{}", text)?;
        Ok(())
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn write_medication_line<W: Write>(out: &mut W, medication: &Medication) -> Result<()> {
    let days = if medication.days.len() == DayOfWeek::ALL.len() {
        "daily".to_string()
    } else if medication.days.is_empty() {
        "no days".to_string()
    } else {
        medication
            .days
            .iter()
            .map(|day| day.short_name())
            .collect::<Vec<_>>()
            .join(",")
    };
    writeln!(
        out,
        "[{}] {}  {} {}  ({})",
        medication.position, medication.time_of_day, medication.name, medication.dosage, days
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ScheduleDay;

    fn aspirin_dto() -> Medication {
        Medication {
            position: 0,
            name: "Aspirin".to_string(),
            dosage: "100mg".to_string(),
            time_of_day: "08:00".to_string(),
            days: vec![DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Friday],
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_day_schedule_text() {
        let response = DayScheduleResponse {
            date: "2025-06-02".to_string(),
            day_of_week: DayOfWeek::Monday,
            medications: vec![aspirin_dto()],
        };
        let text = render(|out| Output::new(false).day_schedule(out, &response));
        assert_eq!(
            text,
            "2025-06-02 (Monday)\n[0] 08:00  Aspirin 100mg  (Mon,Wed,Fri)\n"
        );
    }

    #[test]
    fn test_empty_day_text() {
        let response = DayScheduleResponse {
            date: "2025-06-01".to_string(),
            day_of_week: DayOfWeek::Sunday,
            medications: Vec::new(),
        };
        let text = render(|out| Output::new(false).day_schedule(out, &response));
        assert!(text.contains("No medications for this day."));
    }

    #[test]
    fn test_json_mode() {
        let response = MedicationListResponse {
            medications: vec![aspirin_dto()],
        };
        let text = render(|out| Output::new(true).list(out, &response));
        let parsed: MedicationListResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_mutation_shows_flush_warning() {
        let response = MedicationMutationResponse {
            medication: aspirin_dto(),
            success_message: "Medication added".to_string(),
            flush_warning: Some("disk is read-only".to_string()),
        };
        let text = render(|out| Output::new(false).mutation(out, &response));
        assert!(text.starts_with("Medication added\n"));
        assert!(text.contains("warning: not saved to storage: disk is read-only"));
    }

    #[test]
    fn test_month_grid() {
        let month = ScheduleMonth {
            year: 2025,
            month: 6,
            first_day_of_week: 0,
            days: (1..=30)
                .map(|day| ScheduleDay {
                    day,
                    day_of_week: DayOfWeek::ALL[((day - 1) % 7) as usize],
                    medication_positions: if day == 2 { vec![0] } else { Vec::new() },
                })
                .collect(),
        };
        let text = render(|out| Output::new(false).schedule_month(out, &month));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "2025-06");
        assert_eq!(lines[1], "Sun  Mon  Tue  Wed  Thu  Fri  Sat");
        assert_eq!(lines[2], "  1   2*    3    4    5    6    7");
        assert_eq!(lines.last(), Some(&"* = medications scheduled"));
    }
}
