pub mod medication_mapper;

pub use medication_mapper::MedicationMapper;
