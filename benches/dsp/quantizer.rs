//! Benchmarks for the semitone quantizer.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voct_dsp::dsp::{Scale, ScaleQuantizer, SignalProcessor};

use crate::BLOCK_SIZES;

/// Slow sweep across ±5 V, like an LFO into the quantizer.
fn sweep(size: usize) -> Vec<f32> {
    (0..size).map(|i| i as f32 / size as f32 * 10.0 - 5.0).collect()
}

pub fn bench_quantizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/quantizer");

    for &size in BLOCK_SIZES {
        let input = sweep(size);
        let mut output = vec![0.0f32; size];

        // Chromatic - rounding only
        let mut chromatic = ScaleQuantizer::new();
        group.bench_with_input(BenchmarkId::new("chromatic", size), &size, |b, _| {
            b.iter(|| {
                chromatic.process_block(black_box(&input), black_box(&mut output));
            })
        });

        // Pentatonic - rounding plus the outward search for an allowed degree
        let mut pentatonic = ScaleQuantizer::with_scale(Scale::PentatonicMinor);
        group.bench_with_input(BenchmarkId::new("pentatonic_minor", size), &size, |b, _| {
            b.iter(|| {
                pentatonic.process_block(black_box(&input), black_box(&mut output));
            })
        });
    }

    group.finish();
}
