//! Benchmarks for the AR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voct_dsp::dsp::{EnvelopeStage, SignalProcessor};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (long ramp so the bench never reaches the peak)
        let mut env = EnvelopeStage::ar(SAMPLE_RATE, 4.0, 0.3);
        env.gate(true);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Idle at the peak, gate held
        let mut env = EnvelopeStage::ar(SAMPLE_RATE, 0.0, 0.3);
        env.gate(true);
        env.next_sample();
        group.bench_with_input(BenchmarkId::new("held", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Applied to a signal in place
        let mut env = EnvelopeStage::ar(SAMPLE_RATE, 0.01, 4.0);
        env.gate(true);
        env.gate(false);
        group.bench_with_input(BenchmarkId::new("release_in_place", size), &size, |b, _| {
            b.iter(|| {
                buffer.fill(0.5);
                env.process_in_place(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
