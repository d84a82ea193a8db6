// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Recorded events and the recording buffer.
//!
//! The buffer is newest-first: every append goes to the front. It is never
//! capped; views such as the most recent messages or the trimmed chart
//! window are derived without touching the stored events.

use std::collections::VecDeque;

use crate::midi::MidiMessage;
use crate::timing::Position;

use super::registry::ControlAddress;

/// Default tick distance beyond which events fall out of the trimmed view
pub const DEFAULT_TRIM_GAP_TICKS: u64 = 10_000;

/// A message stamped with the position active when it arrived
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    message: MidiMessage,
    text: String,
    ticks: u64,
    position_label: String,
}

impl RecordedEvent {
    /// Snapshot a message at the given position
    pub fn new(message: MidiMessage, position: &Position) -> Self {
        Self {
            text: message.render_text(),
            ticks: position.ticks,
            position_label: position.label(),
            message,
        }
    }

    pub fn message(&self) -> &MidiMessage {
        &self.message
    }

    /// Rendered message text for display
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Clock tick count at arrival
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Zero-based `phrase.bar.beat.tick` at arrival
    pub fn position_label(&self) -> &str {
        &self.position_label
    }

    pub fn address(&self) -> ControlAddress {
        ControlAddress::of(&self.message)
    }

    /// Control value carried by the third byte, if present
    pub fn value(&self) -> Option<u8> {
        self.message.data2()
    }
}

/// Ordered log of recorded events, newest first
#[derive(Debug, Clone, Default)]
pub struct RecordingBuffer {
    events: VecDeque<RecordedEvent>,
}

impl RecordingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an event
    pub fn append(&mut self, event: RecordedEvent) {
        self.events.push_front(event);
    }

    /// Remove all events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Most recent event
    pub fn latest(&self) -> Option<&RecordedEvent> {
        self.events.front()
    }

    /// Events in storage order (newest first)
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &RecordedEvent> + '_ {
        self.events.iter()
    }

    /// Events in recording order (oldest first)
    pub fn chronological(&self) -> impl Iterator<Item = &RecordedEvent> + '_ {
        self.events.iter().rev()
    }

    /// The `count` newest events, newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &RecordedEvent> + '_ {
        self.events.iter().take(count)
    }

    /// Events within `gap` ticks of the most recent event, newest first.
    ///
    /// The stored events are left untouched.
    pub fn trimmed(&self, gap: u64) -> Vec<&RecordedEvent> {
        let Some(last_ticks) = self.latest().map(RecordedEvent::ticks) else {
            return Vec::new();
        };
        self.events
            .iter()
            .filter(|e| e.ticks.abs_diff(last_ticks) <= gap)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_at(ticks: u64, bytes: &[u8]) -> RecordedEvent {
        let position = Position {
            ticks,
            ..Position::ZERO
        };
        RecordedEvent::new(MidiMessage::new(ticks as f64, bytes), &position)
    }

    #[test]
    fn test_recorded_event_snapshot() {
        let position = Position {
            ticks: 123,
            phrase: 0,
            bar: 1,
            beat: 1,
            tick: 3,
        };
        let event = RecordedEvent::new(MidiMessage::new(2.0, vec![0x90, 0x2C, 0x7F]), &position);
        assert_eq!(event.ticks(), 123);
        assert_eq!(event.position_label(), "0.1.1.3");
        assert_eq!(event.text(), "2: [3 bytes]: 0x90 0x2c 0x7f");
        assert_eq!(event.address().as_str(), "0x90 0x2c");
        assert_eq!(event.value(), Some(127));
    }

    #[test]
    fn test_append_prepends() {
        let mut buffer = RecordingBuffer::new();
        buffer.append(event_at(1, &[0xB0, 1, 10]));
        buffer.append(event_at(2, &[0xB0, 1, 20]));
        buffer.append(event_at(3, &[0xB0, 1, 30]));

        let newest_first: Vec<u64> = buffer.iter().map(|e| e.ticks()).collect();
        assert_eq!(newest_first, vec![3, 2, 1]);

        let oldest_first: Vec<u64> = buffer.chronological().map(|e| e.ticks()).collect();
        assert_eq!(oldest_first, vec![1, 2, 3]);
        assert_eq!(buffer.latest().map(|e| e.ticks()), Some(3));
    }

    #[test]
    fn test_recent_truncates_view_only() {
        let mut buffer = RecordingBuffer::new();
        for t in 0..50 {
            buffer.append(event_at(t, &[0xB0, 1, 0]));
        }
        assert_eq!(buffer.recent(20).count(), 20);
        assert_eq!(buffer.recent(20).next().map(|e| e.ticks()), Some(49));
        assert_eq!(buffer.len(), 50);
    }

    #[test]
    fn test_clear() {
        let mut buffer = RecordingBuffer::new();
        buffer.append(event_at(1, &[0x90, 60, 100]));
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.latest().is_none());
    }

    #[test]
    fn test_trimmed_drops_distant_events() {
        let mut buffer = RecordingBuffer::new();
        buffer.append(event_at(0, &[0xB0, 1, 1]));
        buffer.append(event_at(5_000, &[0xB0, 1, 2]));
        buffer.append(event_at(20_000, &[0xB0, 1, 3]));
        buffer.append(event_at(25_000, &[0xB0, 1, 4]));

        let kept: Vec<u64> = buffer
            .trimmed(DEFAULT_TRIM_GAP_TICKS)
            .iter()
            .map(|e| e.ticks())
            .collect();
        assert_eq!(kept, vec![25_000, 20_000]);
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_trimmed_handles_position_reset() {
        // Ticks go back to zero after a Stop; distance is measured both ways
        let mut buffer = RecordingBuffer::new();
        buffer.append(event_at(50_000, &[0xB0, 1, 1]));
        buffer.append(event_at(10, &[0xB0, 1, 2]));

        let kept: Vec<u64> = buffer.trimmed(100).iter().map(|e| e.ticks()).collect();
        assert_eq!(kept, vec![10]);
    }

    #[test]
    fn test_trimmed_keeps_event_exactly_gap_away() {
        let mut buffer = RecordingBuffer::new();
        buffer.append(event_at(0, &[0xB0, 1, 1]));
        buffer.append(event_at(100, &[0xB0, 1, 2]));

        let kept: Vec<u64> = buffer.trimmed(100).iter().map(|e| e.ticks()).collect();
        assert_eq!(kept, vec![100, 0]);
    }

    #[test]
    fn test_trimmed_drops_event_one_past_gap() {
        let mut buffer = RecordingBuffer::new();
        buffer.append(event_at(0, &[0xB0, 1, 1]));
        buffer.append(event_at(101, &[0xB0, 1, 2]));

        let kept: Vec<u64> = buffer.trimmed(100).iter().map(|e| e.ticks()).collect();
        assert_eq!(kept, vec![101]);
    }

    #[test]
    fn test_trimmed_empty() {
        assert!(RecordingBuffer::new().trimmed(10).is_empty());
    }
}
