// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI recorder.
//!
//! Records messages from a MIDI input, stamps each with a musical position
//! derived from the incoming clock, remembers user-assigned names for
//! control addresses per device and exports the recording as CSV.

pub mod config;
pub mod error;
pub mod midi;
pub mod recorder;
pub mod recording;
pub mod session;
pub mod timing;
pub mod ui;

pub use config::{ControlNameStore, MemoryControlNameStore, RecorderConfig, YamlControlNameStore};
pub use error::{ConfigError, DeviceError, ExportError, StoreError};
pub use midi::{DeviceInfo, MidiMessage};
pub use recorder::Recorder;
pub use recording::{ControlAddress, ControlRegistry, CsvExporter, RecordedEvent, RecordingBuffer};
pub use session::{Handled, RecordingSession};
pub use timing::Position;
