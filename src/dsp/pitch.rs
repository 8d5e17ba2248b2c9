/*
Exponential Pitch Law
=====================

Pitch perception is logarithmic: each octave doubles the frequency. The
volt/octave convention makes this linear in volts, so converting back to Hz
is an exponential:

    f = base_tuning * 2^(volts + detune - octave_adjust + knob_center)

  base_tuning     Reference pitch, 440 Hz (concert A4).
  octave_adjust   How many octaves below the reference 0 V lands. With 5.0,
                  0 V sits five octaves under A4, leaving the useful
                  range above it for a positive CV.
  knob_center     Fixed cosmetic nudge (0.68 V) so the detune knob's middle
                  lands near a C. Not derived from anything; measured by ear.

Adding 1 V always doubles the result, whatever the constants are.


Fast exp2
---------

`f32::powf` is accurate but its cost varies with the input and it may call
into libm. At audio rate we want a fixed, small amount of work:

    x = n + f          n = round(x) integer, f in [-0.5, 0.5]
    2^x = 2^n * 2^f

  2^n   built directly from the float exponent bits (no math at all)
  2^f   a short polynomial: e^(f·ln2) to 7th order, error < 3e-7 relative

x is clamped to ±126 first so 2^n is always a normal float and the result can
never overflow to infinity.
*/

use std::f32::consts::LN_2;

use super::sanitize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest exponent magnitude that keeps 2^n a normal f32.
const MAX_EXPONENT: f32 = 126.0;

/// Base-2 exponential with bounded cost and a finite result for any input.
#[inline]
pub fn fast_exp2(x: f32) -> f32 {
    let x = sanitize(x).clamp(-MAX_EXPONENT, MAX_EXPONENT);
    let whole = x.round();
    let t = (x - whole) * LN_2;

    let poly = 1.0
        + t * (1.0
            + t * (1.0 / 2.0
                + t * (1.0 / 6.0
                    + t * (1.0 / 24.0
                        + t * (1.0 / 120.0 + t * (1.0 / 720.0 + t * (1.0 / 5040.0)))))));

    let bits = ((whole as i32 + 127) as u32) << 23;
    poly * f32::from_bits(bits)
}

/// Tuning constants for the exponential pitch law.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningConfig {
    /// Reference pitch in Hz.
    pub base_tuning_hz: f32,
    /// Octaves below the reference that 0 V maps to.
    pub octave_adjust: f32,
    /// Fixed nudge so a centered detune knob lands near C.
    pub knob_center_adjustment: f32,
}

impl TuningConfig {
    /// Plain A4 = 440 Hz at 0 V, no adjustments.
    pub const fn reference() -> Self {
        Self {
            base_tuning_hz: 440.0,
            octave_adjust: 0.0,
            knob_center_adjustment: 0.0,
        }
    }
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            base_tuning_hz: 440.0,
            octave_adjust: 5.0,
            knob_center_adjustment: 0.68,
        }
    }
}

/// Maps pitch voltage (plus detune) to oscillator frequency in Hz.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyMapper {
    tuning: TuningConfig,
}

impl FrequencyMapper {
    pub fn new(tuning: TuningConfig) -> Self {
        Self { tuning }
    }

    #[inline]
    pub fn voltage_to_frequency(&self, volts: f32, detune_volts: f32) -> f32 {
        let TuningConfig {
            base_tuning_hz,
            octave_adjust,
            knob_center_adjustment,
        } = self.tuning;

        base_tuning_hz * fast_exp2(volts + detune_volts - octave_adjust + knob_center_adjustment)
    }

    pub fn tuning(&self) -> TuningConfig {
        self.tuning
    }
}
