//! # MediManage Backend
//!
//! Contains all non-UI logic for the medication reminder.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (command line, output rendering)
//!     ↓
//! Domain Layer (medication store, day filter, schedules)
//!     ↓
//! Storage Layer (JSON codec over a key/value blob store)
//! ```
//!
//! The domain is synchronous and single-threaded: one front end owns one
//! [`MedicationService`], and every change is flushed before control returns.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use config::AppConfig;
use domain::{Clock, MedicationService, MedicationStore, SystemClock};
use storage::{FileBlobStorage, MedicationRepository};

/// Everything a front end needs, wired together
pub struct AppState {
    pub medication_service: MedicationService,
}

/// Set up storage and services for the configured data directory
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    initialize_backend_with_clock(config, Arc::new(SystemClock))
}

/// [`initialize_backend`] with an explicit clock
pub fn initialize_backend_with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<AppState> {
    info!("Setting up storage in {:?}", config.data_directory);
    let storage = FileBlobStorage::new(&config.data_directory).with_context(|| {
        format!(
            "Failed to create data directory {}",
            config.data_directory.display()
        )
    })?;
    let repository = MedicationRepository::new(Arc::new(storage), config.storage_key.clone());

    info!("Loading medications from slot '{}'", repository.key());
    let store = MedicationStore::open(repository, clock.clone());
    info!("Loaded {} medications", store.len());

    Ok(AppState {
        medication_service: MedicationService::new(store, clock),
    })
}
