// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the recorder's collaborators.

use std::io;

use thiserror::Error;

/// Failures talking to the MIDI backend
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to create MIDI client: {0}")]
    Init(String),
    #[error("MIDI port {0} not found")]
    PortNotFound(String),
    #[error("failed to connect to MIDI port: {0}")]
    Connect(String),
}

/// Failures reading or writing the control name store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("control name store I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed control name store: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failures writing a CSV export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("download name must not be empty")]
    EmptyName,
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
}

/// Failures loading or saving the recorder configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
