// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI message model and classification.
//!
//! This module provides the raw message record delivered by input devices,
//! the status byte constants the recorder cares about, and the classifier
//! that separates transport (clock/stop) traffic from recordable events.

pub mod input;

pub use input::{
    list_inputs, list_outputs, print_destinations, print_sources, resolve_device, Delivery, DeviceInfo,
    InputRouter,
};

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const CONTROL_CHANGE: u8 = 0xB0;

    // System Real-Time Messages
    pub const TIMING_CLOCK: u8 = 0xF8;
    pub const START: u8 = 0xFA;
    pub const CONTINUE: u8 = 0xFB;
    pub const STOP: u8 = 0xFC;
}

/// A raw MIDI message as delivered by an input device.
///
/// Never mutated after receipt; everything the recorder derives (position,
/// control address, CSV cells) is computed from these bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct MidiMessage {
    timestamp: f64,
    bytes: Vec<u8>,
}

impl MidiMessage {
    /// Create a message from a timestamp in milliseconds and its raw bytes
    pub fn new(timestamp: f64, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            timestamp,
            bytes: bytes.into(),
        }
    }

    /// Create a message from a midir callback (timestamp in microseconds)
    pub fn from_midir(timestamp_us: u64, bytes: &[u8]) -> Self {
        Self::new(timestamp_us as f64 / 1000.0, bytes)
    }

    /// Arrival time in milliseconds
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Raw message bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Status byte, if the message has one
    pub fn status(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// First data byte (note number, controller number, ...)
    pub fn data1(&self) -> Option<u8> {
        self.bytes.get(1).copied()
    }

    /// Second data byte (velocity, controller value, ...)
    pub fn data2(&self) -> Option<u8> {
        self.bytes.get(2).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Human readable rendering, e.g. `12.5: [3 bytes]: 0x90 0x2c 0x7f`
    pub fn render_text(&self) -> String {
        format!(
            "{}: [{} bytes]: {}",
            self.timestamp,
            self.bytes.len(),
            hex_tokens(&self.bytes)
        )
    }
}

/// Format bytes as space separated `0x`-prefixed lowercase hex tokens
pub(crate) fn hex_tokens(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{:x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Result of classifying a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Status byte is a system real-time transport byte (0xF8..=0xFC)
    pub is_transport: bool,
    /// Message should be appended to the recording
    pub recordable: bool,
}

/// Check if a status byte falls in the real-time transport range
pub fn is_transport(status: u8) -> bool {
    (messages::TIMING_CLOCK..=messages::STOP).contains(&status)
}

/// Decide whether a message is transport traffic and whether it gets recorded.
///
/// Transport messages are only recorded when `include_transport` is set;
/// everything else is always recordable.
pub fn classify(message: &MidiMessage, include_transport: bool) -> Classification {
    let is_transport = message.status().map(is_transport).unwrap_or(false);
    Classification {
        is_transport,
        recordable: include_transport || !is_transport,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_message_constants() {
        assert_eq!(messages::NOTE_ON, 0x90);
        assert_eq!(messages::NOTE_OFF, 0x80);
        assert_eq!(messages::TIMING_CLOCK, 0xF8);
        assert_eq!(messages::START, 0xFA);
        assert_eq!(messages::STOP, 0xFC);
    }

    #[test]
    fn test_transport_range() {
        for b in 0..=u8::MAX {
            assert_eq!(is_transport(b), (0xF8..=0xFC).contains(&b), "byte {:#x}", b);
        }
    }

    #[test]
    fn test_classify_clock() {
        let clock = MidiMessage::new(0.0, vec![messages::TIMING_CLOCK]);

        let excluded = classify(&clock, false);
        assert!(excluded.is_transport);
        assert!(!excluded.recordable);

        let included = classify(&clock, true);
        assert!(included.is_transport);
        assert!(included.recordable);
    }

    #[test]
    fn test_classify_note_always_recordable() {
        let note = MidiMessage::new(0.0, vec![messages::NOTE_ON, 0x2C, 0x7F]);
        for include in [false, true] {
            let c = classify(&note, include);
            assert!(!c.is_transport);
            assert!(c.recordable);
        }
    }

    #[test]
    fn test_classify_outside_realtime_range() {
        // Active sensing and reset sit above the transport range
        for status in [0xF7, 0xFE, 0xFF] {
            let c = classify(&MidiMessage::new(0.0, vec![status]), false);
            assert!(!c.is_transport);
            assert!(c.recordable);
        }
    }

    #[test]
    fn test_classify_empty_message() {
        let c = classify(&MidiMessage::new(0.0, Vec::new()), false);
        assert!(!c.is_transport);
        assert!(c.recordable);
    }

    #[test]
    fn test_data_bytes_tolerate_short_messages() {
        let msg = MidiMessage::new(1.0, vec![0xC0]);
        assert_eq!(msg.status(), Some(0xC0));
        assert_eq!(msg.data1(), None);
        assert_eq!(msg.data2(), None);
    }

    #[test]
    fn test_render_text() {
        let msg = MidiMessage::new(12.5, vec![0x90, 0x2C, 0x7F]);
        assert_eq!(msg.render_text(), "12.5: [3 bytes]: 0x90 0x2c 0x7f");

        let clock = MidiMessage::new(3.0, vec![0xF8]);
        assert_eq!(clock.render_text(), "3: [1 bytes]: 0xf8");
    }

    #[test]
    fn test_from_midir_timestamp() {
        let msg = MidiMessage::from_midir(1_500, &[0xB0, 1, 64]);
        assert_eq!(msg.timestamp(), 1.5);
        assert_eq!(msg.bytes(), &[0xB0, 1, 64]);
    }
}
