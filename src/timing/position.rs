// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Musical position derived from incoming MIDI clock.
//!
//! The position is a cascading odometer driven by Timing Clock bytes at
//! 24 PPQN in an assumed 4/4 meter: 24 ticks make a beat, 4 beats a bar,
//! 4 bars a phrase. A Stop byte returns everything to zero.

use std::fmt;

use crate::midi::messages;

/// Pulses Per Quarter Note - MIDI standard is 24
pub const PPQN: u8 = 24;

/// Beats per bar (4/4)
pub const BEATS_PER_BAR: u8 = 4;

/// Bars per phrase
pub const BARS_PER_PHRASE: u8 = 4;

/// Current musical position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Clock ticks received since the last reset
    pub ticks: u64,
    /// Phrase count
    pub phrase: u32,
    /// Bar within the phrase (0-3)
    pub bar: u8,
    /// Beat within the bar (0-3)
    pub beat: u8,
    /// Tick within the beat (0-23)
    pub tick: u8,
}

impl Position {
    /// The zero position
    pub const ZERO: Position = Position {
        ticks: 0,
        phrase: 0,
        bar: 0,
        beat: 0,
        tick: 0,
    };

    /// Position after a reset
    pub fn reset() -> Self {
        Self::ZERO
    }

    /// Apply a status byte.
    ///
    /// Timing Clock advances the odometer, Stop resets it, anything else
    /// leaves the position untouched.
    pub fn advance(self, status: u8) -> Self {
        match status {
            messages::TIMING_CLOCK => self.clock_tick(),
            messages::STOP => Self::reset(),
            _ => self,
        }
    }

    /// Advance by a single clock tick
    pub fn clock_tick(self) -> Self {
        let tick_overflow = self.tick == PPQN - 1;
        let beat_overflow = tick_overflow && self.beat == BEATS_PER_BAR - 1;
        let bar_overflow = beat_overflow && self.bar == BARS_PER_PHRASE - 1;

        Self {
            ticks: self.ticks.saturating_add(1),
            tick: (self.tick + 1) % PPQN,
            beat: (self.beat + tick_overflow as u8) % BEATS_PER_BAR,
            bar: (self.bar + beat_overflow as u8) % BARS_PER_PHRASE,
            phrase: self.phrase.saturating_add(bar_overflow as u32),
        }
    }

    /// Zero-based `phrase.bar.beat.tick` label stored with recorded events
    pub fn label(&self) -> String {
        format!("{}.{}.{}.{}", self.phrase, self.bar, self.beat, self.tick)
    }
}

impl fmt::Display for Position {
    /// One-based phrase/bar/beat for display, followed by the raw tick count
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{} ({})",
            self.phrase + 1,
            self.bar + 1,
            self.beat + 1,
            self.tick,
            self.ticks
        )
    }
}
