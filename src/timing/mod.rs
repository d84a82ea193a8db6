// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! Tracks the musical position of an external clock master.

pub mod position;

pub use position::{Position, BARS_PER_PHRASE, BEATS_PER_BAR, PPQN};
