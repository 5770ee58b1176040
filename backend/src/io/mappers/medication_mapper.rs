//! Mappers for converting between medication domain models and shared DTOs.

use shared::{
    CreateMedicationRequest, DeleteMedicationRequest, Medication as SharedMedication,
    MedicationMutationResponse, UpdateMedicationRequest,
};

use crate::domain::commands::{
    CreateMedicationCommand, DeleteMedicationCommand, MedicationMutationResult,
    UpdateMedicationCommand,
};
use crate::domain::models::{parse_time_of_day, Medication};
use crate::domain::{MedicationError, ScheduledMedication};

pub struct MedicationMapper;

impl MedicationMapper {
    pub fn to_dto(position: usize, medication: &Medication) -> SharedMedication {
        SharedMedication {
            position,
            name: medication.name().to_string(),
            dosage: medication.dosage().to_string(),
            time_of_day: medication.time_of_day().format("%H:%M").to_string(),
            days: medication.recurrence_days().as_slice().to_vec(),
        }
    }

    pub fn scheduled_to_dto(entry: &ScheduledMedication<'_>) -> SharedMedication {
        Self::to_dto(entry.index, entry.medication)
    }

    pub fn list_to_dto(medications: &[Medication]) -> Vec<SharedMedication> {
        medications
            .iter()
            .enumerate()
            .map(|(position, medication)| Self::to_dto(position, medication))
            .collect()
    }

    pub fn to_create_command(
        request: CreateMedicationRequest,
    ) -> Result<CreateMedicationCommand, MedicationError> {
        Ok(CreateMedicationCommand {
            name: request.name,
            dosage: request.dosage,
            time_of_day: parse_time(&request.time_of_day)?,
            days: request.days,
        })
    }

    pub fn to_update_command(
        request: UpdateMedicationRequest,
    ) -> Result<UpdateMedicationCommand, MedicationError> {
        Ok(UpdateMedicationCommand {
            index: request.position,
            name: request.name,
            dosage: request.dosage,
            time_of_day: request.time_of_day.as_deref().map(parse_time).transpose()?,
            days: request.days,
        })
    }

    pub fn to_delete_command(request: DeleteMedicationRequest) -> DeleteMedicationCommand {
        DeleteMedicationCommand {
            index: request.position,
        }
    }

    pub fn to_mutation_response(
        result: MedicationMutationResult,
        success_message: impl Into<String>,
    ) -> MedicationMutationResponse {
        MedicationMutationResponse {
            medication: Self::to_dto(result.index, &result.medication),
            success_message: success_message.into(),
            flush_warning: result.flush_error,
        }
    }
}

fn parse_time(text: &str) -> Result<chrono::NaiveTime, MedicationError> {
    parse_time_of_day(text).ok_or_else(|| MedicationError::InvalidTime(text.to_string()))
}
