// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for midirec.
//!
//! Recorder settings and device selections live in a TOML file; control
//! names are kept separately in a YAML store (see `store`).

pub mod store;

pub use store::{ControlNameStore, MemoryControlNameStore, YamlControlNameStore};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::recording::DEFAULT_TRIM_GAP_TICKS;

const APP_DIR: &str = "midirec";
const CONFIG_FILE: &str = "config.toml";
const CONTROL_NAMES_FILE: &str = "control_names.yaml";
const LOG_FILE: &str = "midirec.log";

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecorderConfig {
    /// Recording behaviour
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Selected devices per role
    #[serde(default)]
    pub devices: DeviceSelection,
}

impl RecorderConfig {
    /// Load a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Load from `path`, falling back to defaults if it is missing or broken
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Parse a configuration from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Recording settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordingConfig {
    /// Record clock and stop messages as well
    #[serde(default)]
    pub include_transport: bool,
    /// Tick distance kept in the paused chart view
    #[serde(default = "default_trim_gap")]
    pub trim_gap_ticks: u64,
    /// Number of recent messages shown
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
    /// File stem for CSV exports
    #[serde(default = "default_download_name")]
    pub download_name: String,
    /// Directory CSV exports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_trim_gap() -> u64 {
    DEFAULT_TRIM_GAP_TICKS
}
fn default_display_limit() -> usize {
    20
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// `midirec-YYYY-MM-DD` for today
pub fn default_download_name() -> String {
    format!("midirec-{}", chrono::Local::now().format("%Y-%m-%d"))
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            include_transport: false,
            trim_gap_ticks: default_trim_gap(),
            display_limit: default_display_limit(),
            download_name: default_download_name(),
            output_dir: default_output_dir(),
        }
    }
}

/// Device ids selected for each role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DeviceSelection {
    /// Input whose messages are recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_input: Option<String>,
    /// Input used for controlling the recorder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_input: Option<String>,
    /// Output device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Per-user directory holding config, control names and logs
pub fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn default_config_path() -> PathBuf {
    app_dir().join(CONFIG_FILE)
}

pub fn default_control_names_path() -> PathBuf {
    app_dir().join(CONTROL_NAMES_FILE)
}

pub fn default_log_path() -> PathBuf {
    app_dir().join(LOG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[recording]
include_transport = true
trim_gap_ticks = 500
display_limit = 5
download_name = "session"
output_dir = "takes"

[devices]
recording_input = "port-a"
output = "port-z"
"#;

        let config = RecorderConfig::from_toml(toml).unwrap();
        assert!(config.recording.include_transport);
        assert_eq!(config.recording.trim_gap_ticks, 500);
        assert_eq!(config.recording.display_limit, 5);
        assert_eq!(config.recording.download_name, "session");
        assert_eq!(config.recording.output_dir, PathBuf::from("takes"));
        assert_eq!(config.devices.recording_input.as_deref(), Some("port-a"));
        assert_eq!(config.devices.control_input, None);
        assert_eq!(config.devices.output.as_deref(), Some("port-z"));
    }

    #[test]
    fn test_default_values() {
        let config = RecorderConfig::from_toml("").unwrap();
        assert!(!config.recording.include_transport);
        assert_eq!(config.recording.trim_gap_ticks, 10_000);
        assert_eq!(config.recording.display_limit, 20);
        assert!(config.recording.download_name.starts_with("midirec-"));
        assert_eq!(config.recording.download_name.len(), "midirec-2026-01-01".len());
        assert_eq!(config.devices, DeviceSelection::default());
    }

    #[test]
    fn test_round_trip() {
        let mut original = RecorderConfig::default();
        original.recording.include_transport = true;
        original.devices.control_input = Some("ctl".to_string());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        original.save(&path).unwrap();

        let loaded = RecorderConfig::load(&path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_or_default_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "recording = [[[").unwrap();
        assert_eq!(
            RecorderConfig::load_or_default(&path).recording.trim_gap_ticks,
            DEFAULT_TRIM_GAP_TICKS
        );
        assert!(RecorderConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecorderConfig::load_or_default(dir.path().join("absent.toml"));
        assert!(config.devices.recording_input.is_none());
    }
}
