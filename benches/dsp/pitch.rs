//! Benchmarks for volt/octave to Hz mapping.
//!
//! `exp2` is the libm baseline; `fast_exp2` must beat it with input-independent
//! cost, so it's measured on both small and clamped-range inputs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voct_dsp::dsp::{pitch::fast_exp2, FrequencyMapper};

use crate::BLOCK_SIZES;

pub fn bench_pitch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/pitch");

    for &size in BLOCK_SIZES {
        let volts: Vec<f32> = (0..size).map(|i| i as f32 / size as f32 * 10.0 - 5.0).collect();
        let huge: Vec<f32> = volts.iter().map(|v| v * 1.0e6).collect();
        let mut out = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("std_exp2", size), &size, |b, _| {
            b.iter(|| {
                for (o, &v) in out.iter_mut().zip(black_box(&volts)) {
                    *o = v.exp2();
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("fast_exp2", size), &size, |b, _| {
            b.iter(|| {
                for (o, &v) in out.iter_mut().zip(black_box(&volts)) {
                    *o = fast_exp2(v);
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("fast_exp2_clamped", size), &size, |b, _| {
            b.iter(|| {
                for (o, &v) in out.iter_mut().zip(black_box(&huge)) {
                    *o = fast_exp2(v);
                }
            })
        });

        let mapper = FrequencyMapper::default();
        group.bench_with_input(BenchmarkId::new("voltage_to_frequency", size), &size, |b, _| {
            b.iter(|| {
                for (o, &v) in out.iter_mut().zip(black_box(&volts)) {
                    *o = mapper.voltage_to_frequency(v, 0.0);
                }
            })
        });
    }

    group.finish();
}
