//! Benchmarks for the quantizer and oscillator patches.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voct_dsp::{
    io::{AudioBuffer, Channel},
    patch::{ButtonId, OscillatorPatch, Patch, QuantizerPatch},
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_patches(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/patches");

    for &size in BLOCK_SIZES {
        let mut buffer = AudioBuffer::new(2, size);
        let input: Vec<f32> = (0..size).map(|i| (i as f32 / size as f32) - 0.5).collect();

        // === QUANTIZER ===
        let mut quantizer = QuantizerPatch::default();
        group.bench_with_input(BenchmarkId::new("quantizer", size), &size, |b, _| {
            b.iter(|| {
                buffer.samples_mut(Channel::Left).copy_from_slice(&input);
                quantizer.process_audio(black_box(&mut buffer));
            })
        });

        // === QUANTIZER, HOLDING ===
        // Should be a plain fill
        let mut held = QuantizerPatch::default();
        held.button_changed(ButtonId::A, 1, 0);
        group.bench_with_input(BenchmarkId::new("quantizer_hold", size), &size, |b, _| {
            b.iter(|| {
                held.process_audio(black_box(&mut buffer));
            })
        });

        // === OSCILLATOR, GATED ===
        let mut oscillator = OscillatorPatch::new(SAMPLE_RATE);
        oscillator.button_changed(ButtonId::A, 1, 0);
        group.bench_with_input(BenchmarkId::new("oscillator", size), &size, |b, _| {
            b.iter(|| {
                buffer.samples_mut(Channel::Left).fill(0.1);
                oscillator.process_audio(black_box(&mut buffer));
            })
        });

        // === QUANTIZER → OSCILLATOR ===
        let mut quantizer = QuantizerPatch::default();
        let mut oscillator = OscillatorPatch::new(SAMPLE_RATE);
        oscillator.button_changed(ButtonId::A, 1, 0);
        group.bench_with_input(BenchmarkId::new("chain", size), &size, |b, _| {
            b.iter(|| {
                buffer.samples_mut(Channel::Left).copy_from_slice(&input);
                quantizer.process_audio(&mut buffer);
                oscillator.process_audio(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
