//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voct_dsp::dsp::{Oscillator, OscillatorBlock};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let oscillators = [
            ("sine", OscillatorBlock::sine(SAMPLE_RATE)),
            ("saw", OscillatorBlock::saw(SAMPLE_RATE)),
            ("square", OscillatorBlock::square(SAMPLE_RATE)),
            ("triangle", OscillatorBlock::triangle(SAMPLE_RATE)),
        ];

        for (name, mut osc) in oscillators {
            osc.set_frequency(440.0);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.generate(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
