// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Per-control value series for charting a paused recording.

use super::capture::RecordedEvent;
use super::registry::{label_in, ControlNameMap};

/// Values of one control over time
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// `{name} ({address})`
    pub label: String,
    /// `(ticks, value)` pairs, oldest first
    pub points: Vec<(u64, u8)>,
}

impl ChartSeries {
    /// Tick range covered by the series
    pub fn tick_range(&self) -> Option<(u64, u64)> {
        let min = self.points.iter().map(|p| p.0).min()?;
        let max = self.points.iter().map(|p| p.0).max()?;
        Some((min, max))
    }
}

/// Group events (newest first, as stored) into one series per control
pub fn chart_series<'a, I>(events: I, names: &ControlNameMap) -> Vec<ChartSeries>
where
    I: IntoIterator<Item = &'a RecordedEvent>,
    I::IntoIter: DoubleEndedIterator,
{
    let mut series: Vec<ChartSeries> = Vec::new();

    for event in events.into_iter().rev() {
        let Some(value) = event.value() else {
            continue;
        };
        let label = label_in(names, &event.address());
        match series.iter_mut().find(|s| s.label == label) {
            Some(existing) => existing.points.push((event.ticks(), value)),
            None => series.push(ChartSeries {
                label,
                points: vec![(event.ticks(), value)],
            }),
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::MidiMessage;
    use crate::recording::RecordingBuffer;
    use crate::timing::Position;

    fn record(buffer: &mut RecordingBuffer, ticks: u64, bytes: &[u8]) {
        let position = Position {
            ticks,
            ..Position::ZERO
        };
        buffer.append(RecordedEvent::new(MidiMessage::new(0.0, bytes), &position));
    }

    #[test]
    fn test_series_grouped_by_control() {
        let mut buffer = RecordingBuffer::new();
        record(&mut buffer, 0, &[0xB0, 1, 10]);
        record(&mut buffer, 5, &[0xB0, 2, 99]);
        record(&mut buffer, 9, &[0xB0, 1, 30]);

        let series = chart_series(buffer.iter(), &ControlNameMap::new());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "unnamed (0xb0 0x1)");
        assert_eq!(series[0].points, vec![(0, 10), (9, 30)]);
        assert_eq!(series[1].points, vec![(5, 99)]);
        assert_eq!(series[0].tick_range(), Some((0, 9)));
    }

    #[test]
    fn test_series_skip_valueless_events() {
        let mut buffer = RecordingBuffer::new();
        record(&mut buffer, 1, &[0xF8]);
        assert!(chart_series(buffer.iter(), &ControlNameMap::new()).is_empty());
    }
}
