// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Recording session.
//!
//! Owns the position, the recording buffer and the control registry, and
//! applies one incoming message at a time to all three.

use tracing::{debug, info, warn};

use crate::config::{ControlNameStore, RecordingConfig};
use crate::error::StoreError;
use crate::midi::{classify, DeviceInfo, MidiMessage};
use crate::recording::{
    chart_series, to_csv, ChartSeries, ControlAddress, ControlNameMap, ControlRegistry, RecordedEvent,
    RecordingBuffer, DEFAULT_TRIM_GAP_TICKS,
};
use crate::timing::Position;

/// What a message did to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// Recording is paused; the message was dropped
    Paused,
    /// The message had no bytes
    Malformed,
    /// Only the position was affected (transport not recorded)
    PositionOnly,
    /// The message was appended to the recording
    Recorded { address: ControlAddress },
}

/// A live recording session
#[derive(Debug, Clone)]
pub struct RecordingSession {
    position: Position,
    buffer: RecordingBuffer,
    registry: ControlRegistry,
    include_transport: bool,
    recording: bool,
    trim_gap: u64,
    summary: Vec<ChartSeries>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    /// Create a session with default settings, recording immediately
    pub fn new() -> Self {
        Self {
            position: Position::ZERO,
            buffer: RecordingBuffer::new(),
            registry: ControlRegistry::new(),
            include_transport: false,
            recording: true,
            trim_gap: DEFAULT_TRIM_GAP_TICKS,
            summary: Vec::new(),
        }
    }

    /// Create a session from the recording settings
    pub fn with_config(config: &RecordingConfig) -> Self {
        Self {
            include_transport: config.include_transport,
            trim_gap: config.trim_gap_ticks,
            ..Self::new()
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn buffer(&self) -> &RecordingBuffer {
        &self.buffer
    }

    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    pub fn include_transport(&self) -> bool {
        self.include_transport
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Chart series computed when the session was last paused
    pub fn summary(&self) -> &[ChartSeries] {
        &self.summary
    }

    /// Apply a single incoming message
    pub fn handle(&mut self, message: MidiMessage) -> Handled {
        if !self.recording {
            return Handled::Paused;
        }
        let Some(status) = message.status() else {
            warn!(timestamp = message.timestamp(), "Dropping empty MIDI message");
            return Handled::Malformed;
        };

        let arrival = self.position;
        self.position = arrival.advance(status);

        if !classify(&message, self.include_transport).recordable {
            return Handled::PositionOnly;
        }

        let address = ControlAddress::of(&message);
        debug!(address = %address, ticks = arrival.ticks, "Recorded message");
        self.buffer.append(RecordedEvent::new(message, &arrival));
        self.registry.register_seen(address.clone());
        Handled::Recorded { address }
    }

    /// Return the position to zero
    pub fn reset_position(&mut self) {
        self.position = Position::reset();
        info!("Position reset");
    }

    /// Drop all recorded events
    pub fn clear_recording(&mut self) {
        let count = self.buffer.len();
        self.buffer.clear();
        info!(count, "Recording cleared");
    }

    /// Choose whether clock/stop messages are recorded
    pub fn set_include_transport(&mut self, include: bool) {
        self.include_transport = include;
    }

    /// Switch between recording and paused. Returns the new recording state.
    ///
    /// Pausing computes the chart summary over the trimmed window; resuming
    /// discards it.
    pub fn toggle_recording(&mut self) -> bool {
        self.recording = !self.recording;
        if self.recording {
            self.summary.clear();
            info!("Recording resumed");
        } else {
            let window = self.buffer.trimmed(self.trim_gap);
            self.summary = chart_series(window, self.registry.names());
            info!(series = self.summary.len(), "Recording paused");
        }
        self.recording
    }

    /// Make `device` the recording device, restoring its control names.
    ///
    /// A failing store leaves the device with no names rather than failing
    /// the switch.
    pub fn switch_device(&mut self, device: Option<&DeviceInfo>, store: &dyn ControlNameStore) {
        let names = match device {
            Some(device) => store.load_control_names(&device.id).unwrap_or_else(|e| {
                warn!(device = %device.id, error = %e, "Could not restore control names");
                ControlNameMap::new()
            }),
            None => ControlNameMap::new(),
        };
        info!(device = device.map(|d| d.name.as_str()).unwrap_or("none"), "Recording device selected");
        self.registry
            .switch_device(device.map(|d| d.id.clone()), names);
    }

    /// Name a control and persist the active device's names
    pub fn rename_control(
        &mut self,
        address: ControlAddress,
        name: &str,
        store: &mut dyn ControlNameStore,
    ) -> Result<(), StoreError> {
        let names = self.registry.set_name(address, name).clone();
        match self.registry.device_id() {
            Some(device_id) => store.save_control_names(device_id, &names),
            None => Ok(()),
        }
    }

    /// Serialize the recording to CSV, oldest event first
    pub fn export_csv(&self) -> String {
        to_csv(self.buffer.iter(), self.registry.names())
    }
}
