// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for MIDIREC
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Position odometer updates
//! - Message handling throughput
//! - CSV export at growing recording sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use midirec::midi::messages;
use midirec::{MidiMessage, Position, RecordingSession};

/// Benchmark the clock odometer (runs for every incoming clock)
fn bench_position_advance(c: &mut Criterion) {
    c.bench_function("position_advance_phrase", |b| {
        b.iter(|| {
            let mut position = Position::ZERO;
            for _ in 0..384 {
                position = position.advance(black_box(messages::TIMING_CLOCK));
            }
            black_box(position)
        })
    });
}

/// Benchmark interleaved clock and control traffic through a session
fn bench_session_handle(c: &mut Criterion) {
    c.bench_function("session_handle_1000", |b| {
        b.iter_batched(
            RecordingSession::new,
            |mut session| {
                for i in 0..1000u32 {
                    let bytes = if i % 4 == 0 {
                        vec![0xB0, (i % 8) as u8, (i % 128) as u8]
                    } else {
                        vec![messages::TIMING_CLOCK]
                    };
                    black_box(session.handle(MidiMessage::new(i as f64, bytes)));
                }
                session
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

/// Benchmark CSV serialization
fn bench_csv_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_export");

    for size in [100, 1000, 10000].iter() {
        let mut session = RecordingSession::new();
        for i in 0..*size {
            session.handle(MidiMessage::new(0.0, vec![messages::TIMING_CLOCK]));
            session.handle(MidiMessage::new(
                0.0,
                vec![0xB0, (i % 16) as u8, (i % 128) as u8],
            ));
        }

        group.bench_with_input(BenchmarkId::new("to_csv", size), &session, |b, session| {
            b.iter(|| black_box(session.export_csv()))
        });
    }

    group.finish();
}

/// Benchmark computing the paused summary
fn bench_pause_summary(c: &mut Criterion) {
    let mut session = RecordingSession::new();
    for i in 0..5000u32 {
        session.handle(MidiMessage::new(0.0, vec![messages::TIMING_CLOCK]));
        session.handle(MidiMessage::new(0.0, vec![0xB0, (i % 8) as u8, (i % 128) as u8]));
    }

    c.bench_function("pause_summary_5000", |b| {
        b.iter_batched(
            || session.clone(),
            |mut session| {
                session.toggle_recording();
                black_box(session.summary().len())
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_position_advance,
    bench_session_handle,
    bench_csv_export,
    bench_pause_summary,
);
criterion_main!(benches);
