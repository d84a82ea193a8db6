// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Host wiring around a recording session.
//!
//! Connects the session to the selected recording input, the control name
//! store, the persisted configuration and the CSV exporter. Both the
//! headless recorder and the terminal UI drive a `Recorder`.

use std::path::PathBuf;

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};
use tracing::{info, warn};

use crate::config::{ControlNameStore, RecorderConfig};
use crate::error::{DeviceError, ExportError, StoreError};
use crate::midi::{Delivery, DeviceInfo, InputRouter};
use crate::recording::{ControlAddress, CsvExporter};
use crate::session::{Handled, RecordingSession};

/// A recording session attached to devices and storage
pub struct Recorder<S: ControlNameStore> {
    session: RecordingSession,
    router: InputRouter,
    receiver: UnboundedReceiver<Delivery>,
    store: S,
    config: RecorderConfig,
    config_path: Option<PathBuf>,
}

impl<S: ControlNameStore> Recorder<S> {
    /// Create a recorder. Configuration changes are written back to
    /// `config_path` when one is given.
    pub fn new(config: RecorderConfig, config_path: Option<PathBuf>, store: S) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            session: RecordingSession::with_config(&config.recording),
            router: InputRouter::new(sender),
            receiver,
            store,
            config,
            config_path,
        }
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut RecordingSession {
        &mut self.session
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Device currently feeding the session
    pub fn recording_input(&self) -> Option<&DeviceInfo> {
        self.router.active_device()
    }

    /// Attach a new recording input and restore its control names
    pub fn select_recording_input(&mut self, device: &DeviceInfo) -> Result<(), DeviceError> {
        let attached = match self.router.select(&device.id) {
            Ok(attached) => attached,
            Err(e) => {
                // The old input is already detached; its names must go too
                self.session.switch_device(None, &self.store);
                return Err(e);
            }
        };
        self.recording_input_attached(attached);
        Ok(())
    }

    fn recording_input_attached(&mut self, attached: DeviceInfo) {
        self.session.switch_device(Some(&attached), &self.store);
        self.config.devices.recording_input = Some(attached.id);
        self.persist_config();
    }

    /// Id of the selected control input
    pub fn control_input(&self) -> Option<&str> {
        self.config.devices.control_input.as_deref()
    }

    /// Id of the selected output
    pub fn output(&self) -> Option<&str> {
        self.config.devices.output.as_deref()
    }

    /// Remember the control input selection
    pub fn select_control_input(&mut self, device: Option<&DeviceInfo>) {
        self.config.devices.control_input = device.map(|d| d.id.clone());
        self.persist_config();
    }

    /// Remember the output selection
    pub fn select_output(&mut self, device: Option<&DeviceInfo>) {
        self.config.devices.output = device.map(|d| d.id.clone());
        self.persist_config();
    }

    /// Toggle recording of clock/stop messages
    pub fn toggle_include_transport(&mut self) -> bool {
        let include = !self.session.include_transport();
        self.session.set_include_transport(include);
        self.config.recording.include_transport = include;
        self.persist_config();
        include
    }

    /// Record clock/stop messages for this run only; config.toml keeps its value
    pub fn override_include_transport(&mut self, include: bool) {
        self.session.set_include_transport(include);
    }

    pub fn set_download_name(&mut self, name: impl Into<String>) {
        self.config.recording.download_name = name.into();
    }

    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.config.recording.output_dir = dir.into();
    }

    /// Apply a delivery if it came from the current input
    pub fn apply(&mut self, delivery: Delivery) -> Option<Handled> {
        if !self.router.is_current(&delivery) {
            return None;
        }
        Some(self.session.handle(delivery.message))
    }

    /// Apply every delivery waiting in the queue. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(delivery) => {
                    if self.apply(delivery).is_some() {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        applied
    }

    /// Wait for the next delivery and apply it
    pub async fn next(&mut self) -> Option<Handled> {
        loop {
            let delivery = self.receiver.recv().await?;
            if let Some(handled) = self.apply(delivery) {
                return Some(handled);
            }
        }
    }

    /// Name a control on the current device
    pub fn rename_control(&mut self, address: ControlAddress, name: &str) -> Result<(), StoreError> {
        self.session.rename_control(address, name, &mut self.store)
    }

    /// Write the recording to `{download_name}.csv`
    pub fn export(&self) -> Result<PathBuf, ExportError> {
        let exporter = CsvExporter::new(&self.config.recording.output_dir);
        exporter.export(&self.config.recording.download_name, &self.session.export_csv())
    }

    fn persist_config(&self) {
        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        if let Err(e) = self.config.save(path) {
            warn!(path = %path.display(), error = %e, "Failed to save config");
        } else {
            info!(path = %path.display(), "Saved config");
        }
    }
}
