/*
Phase-Accumulator Oscillator
============================

The patch only needs two things from an oscillator: "play at this frequency"
and "fill this buffer". The `Oscillator` trait is exactly that contract, so a
patch can be driven by any waveform source (or a test double).

`OscillatorBlock` is the stock implementation: a naive phase accumulator.

  phase       Position inside one cycle, 0.0 ≤ phase < 1.0.
  increment   How far phase moves per sample: frequency / sample_rate.

    phase: 0.0 ─────────→ 1.0 (wraps to 0.0)

    Sine:      sin(2π · phase)
    Saw:       2 · phase - 1                 ╱│╱│╱│
    Square:    +1 below 0.5, -1 above        ▔▁▔▁▔▁
    Triangle:  1 - 4 · |phase - 0.5|         ╲╱╲╱╲╱

The waveforms are not band-limited; square and saw alias at high pitches.
That's the same trade the hardware patch makes and fine for CV-driven tones.

Frequency is clamped to [0, sample_rate / 2] and non-finite values become 0,
so the increment is always finite and the phase never runs backwards.
*/

use std::f32::consts::TAU;

use super::sanitize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    #[default]
    Square,
    Triangle,
}

/// Contract between a patch and its waveform source.
pub trait Oscillator: Send {
    fn set_frequency(&mut self, hz: f32);

    fn frequency(&self) -> f32;

    /// Overwrite `out` with the next `out.len()` samples of the waveform.
    fn generate(&mut self, out: &mut [f32]);

    fn reset(&mut self) {}
}

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    sample_rate: f32,
    frequency: f32,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform, sample_rate: f32) -> Self {
        Self {
            waveform,
            sample_rate: if sample_rate > 0.0 { sample_rate } else { 48_000.0 },
            frequency: 0.0,
            phase: 0.0,
        }
    }

    pub fn sine(sample_rate: f32) -> Self {
        Self::new(OscillatorWaveform::Sine, sample_rate)
    }

    pub fn saw(sample_rate: f32) -> Self {
        Self::new(OscillatorWaveform::Saw, sample_rate)
    }

    pub fn square(sample_rate: f32) -> Self {
        Self::new(OscillatorWaveform::Square, sample_rate)
    }

    pub fn triangle(sample_rate: f32) -> Self {
        Self::new(OscillatorWaveform::Triangle, sample_rate)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    pub fn set_waveform(&mut self, waveform: OscillatorWaveform) {
        self.waveform = waveform;
    }

    #[inline]
    fn shape(&self, phase: f32) -> f32 {
        match self.waveform {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            OscillatorWaveform::Saw => 2.0 * phase - 1.0,
            OscillatorWaveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

impl Oscillator for OscillatorBlock {
    fn set_frequency(&mut self, hz: f32) {
        self.frequency = sanitize(hz).clamp(0.0, self.sample_rate * 0.5);
    }

    fn frequency(&self) -> f32 {
        self.frequency
    }

    fn generate(&mut self, out: &mut [f32]) {
        let increment = self.frequency / self.sample_rate;
        for sample in out.iter_mut() {
            *sample = self.shape(self.phase);
            self.phase += increment;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}
