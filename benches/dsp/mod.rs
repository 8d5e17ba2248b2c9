//! Benchmarks for low-level DSP primitives.

mod envelope;
mod oscillator;
mod pitch;
mod quantizer;

pub use envelope::bench_envelope;
pub use oscillator::bench_oscillator;
pub use pitch::bench_pitch;
pub use quantizer::bench_quantizer;
