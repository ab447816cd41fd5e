//! Persistent user preferences for the wizard host.
//!
//! The configuration lives next to the saved form state under the data
//! directory and is loaded once at startup. A missing file yields defaults.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{paths, persistence};

pub const DEFAULT_STORAGE_KEY: &str = "form-wizard-storage";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),
}

/// Stores user-configurable wizard preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File stem of the persisted form state inside the data directory.
    #[serde(default = "Config::default_storage_key")]
    pub storage_key: String,
    #[serde(default)]
    pub submission: SubmissionSettings,
    /// Clear saved answers as soon as a submission succeeds.
    #[serde(default)]
    pub reset_after_submit: bool,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub accessibility: AccessibilitySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: Self::default_storage_key(),
            submission: SubmissionSettings::default(),
            reset_after_submit: false,
            ui_color_enabled: Self::default_ui_color_enabled(),
            accessibility: AccessibilitySettings::default(),
        }
    }
}

impl Config {
    pub fn default_storage_key() -> String {
        DEFAULT_STORAGE_KEY.into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSettings {
    #[serde(default = "SubmissionSettings::default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "SubmissionSettings::default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "SubmissionSettings::default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            delay_ms: Self::default_delay_ms(),
            max_attempts: Self::default_max_attempts(),
            retry_backoff_ms: Self::default_retry_backoff_ms(),
        }
    }
}

impl SubmissionSettings {
    pub fn default_delay_ms() -> u64 {
        2000
    }

    pub fn default_max_attempts() -> u32 {
        3
    }

    pub fn default_retry_backoff_ms() -> u64 {
        250
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Attempts are never configured below one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessibilitySettings {
    #[serde(default)]
    pub plain_output: bool,
    #[serde(default)]
    pub high_contrast: bool,
}

/// Handles persistence for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_base_dir(base: &Path) -> Result<Self, ConfigError> {
        let config_dir = paths::config_dir_in(base);
        fs::create_dir_all(&config_dir)?;
        Ok(Self::new(paths::config_file_in(base)))
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        persistence::write_atomic(&self.config_path, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
        let config = manager.load().expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.submission.delay_ms, 2000);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
        fs::write(
            manager.path(),
            r#"{ "storage_key": "custom", "submission": { "delay_ms": 5 } }"#,
        )
        .expect("write config");

        let config = manager.load().expect("load");
        assert_eq!(config.storage_key, "custom");
        assert_eq!(config.submission.delay_ms, 5);
        assert_eq!(config.submission.max_attempts, 3);
        assert!(config.ui_color_enabled);
    }

    #[test]
    fn save_round_trips_through_disk() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
        let mut config = Config::default();
        config.reset_after_submit = true;
        config.accessibility.plain_output = true;

        manager.save(&config).expect("save");
        assert_eq!(manager.load().expect("load"), config);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let settings = SubmissionSettings {
            max_attempts: 0,
            ..SubmissionSettings::default()
        };
        assert_eq!(settings.attempts(), 1);
    }
}
