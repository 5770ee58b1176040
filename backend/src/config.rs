//! # Application Configuration
//!
//! Settings are resolved in this order, later sources winning:
//!
//! 1. Built-in defaults
//! 2. `medimanage.yaml` in the data directory, or the file given with
//!    `--config`
//! 3. Environment: `MEDIMANAGE_DATA_DIR`, `MEDIMANAGE_STORAGE_KEY`
//! 4. `--data-dir` on the command line
//!
//! ## YAML Format
//!
//! ```yaml
//! data_directory: "/home/me/.local/share/MediManage"
//! storage_key: "medications"
//! log_level: "info"
//! ```
//!
//! A relative `data_directory` is resolved against the config file's folder.

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::{validate_key, DEFAULT_STORAGE_KEY};

pub const CONFIG_FILE_NAME: &str = "medimanage.yaml";
pub const DATA_DIR_ENV: &str = "MEDIMANAGE_DATA_DIR";
pub const STORAGE_KEY_ENV: &str = "MEDIMANAGE_STORAGE_KEY";

/// Effective application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the storage slot files
    pub data_directory: PathBuf,
    /// Name of the slot the medication list is stored under
    pub storage_key: String,
    /// Default log filter; `RUST_LOG` takes precedence
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Contents of a config file; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_directory: Option<PathBuf>,
    storage_key: Option<String>,
    log_level: Option<String>,
}

/// Platform data directory (`~/.local/share/MediManage` on Linux), or
/// `./medimanage-data` where the platform has none
pub fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("MediManage"))
        .unwrap_or_else(|| PathBuf::from("medimanage-data"))
}

impl AppConfig {
    /// Resolve the configuration from files, the process environment and
    /// command-line overrides
    pub fn load(config_file: Option<&Path>, data_dir_override: Option<PathBuf>) -> Result<Self> {
        Self::load_with_env(config_file, data_dir_override, |name| std::env::var(name).ok())
    }

    /// [`AppConfig::load`] with an explicit environment lookup
    pub fn load_with_env<F>(
        config_file: Option<&Path>,
        data_dir_override: Option<PathBuf>,
        env: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_data_dir = env(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        let mut config = AppConfig::default();
        if let Some(dir) = data_dir_override.clone().or_else(|| env_data_dir.clone()) {
            config.data_directory = dir;
        }

        let file_path = match config_file {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let candidate = config.data_directory.join(CONFIG_FILE_NAME);
                candidate.is_file().then_some(candidate)
            }
        };

        if let Some(path) = file_path {
            let file = read_config_file(&path)?;
            config.merge_file(file, &path);
            log::debug!("Loaded configuration from {:?}", path);
        }

        if let Some(dir) = env_data_dir {
            config.data_directory = dir;
        }
        if let Some(key) = env(STORAGE_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            config.storage_key = key;
        }
        if let Some(dir) = data_dir_override {
            config.data_directory = dir;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parsed `log_level`
    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .parse::<LevelFilter>()
            .with_context(|| format!("Invalid log_level '{}'", self.log_level))
    }

    /// Render as YAML, in the config file format
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn merge_file(&mut self, file: ConfigFile, path: &Path) {
        if let Some(dir) = file.data_directory {
            self.data_directory = if dir.is_relative() {
                path.parent().map(|parent| parent.join(&dir)).unwrap_or(dir)
            } else {
                dir
            };
        }
        if let Some(key) = file.storage_key {
            self.storage_key = key;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            anyhow::bail!("storage_key cannot be empty");
        }
        validate_key(&self.storage_key).with_context(|| {
            format!(
                "storage_key '{}' must use only letters, digits, '_', '-' and '.', and not start with '.'",
                self.storage_key
            )
        })?;
        self.level_filter()?;
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&content)
        .with_context(|| format!("Malformed config file {}", path.display()))
}
