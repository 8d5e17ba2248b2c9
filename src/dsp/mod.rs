//! Low-level DSP primitives used by the patches.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! own directly inside a patch struct. They stay focused on the signal math;
//! the `patch` module wires them to the host's buffers, buttons and knobs.

/// Affine sample <-> volt conversion from hardware calibration data.
pub mod calibration;
/// Attack/release envelope generator.
pub mod envelope;
/// Oscillator contract and waveform generator.
pub mod oscillator;
/// Volt-per-octave to Hz mapping.
pub mod pitch;
/// Shared per-sample / per-block processing interface.
pub mod processor;
/// 12-tone pitch quantizer.
pub mod quantizer;

pub use calibration::{CalibrationConstants, Direction, VoltageCalibration};
pub use envelope::{EnvelopeStage, EnvelopeState};
pub use oscillator::{Oscillator, OscillatorBlock, OscillatorWaveform};
pub use pitch::{FrequencyMapper, TuningConfig};
pub use processor::SignalProcessor;
pub use quantizer::{Scale, ScaleQuantizer};

/// Replace NaN and infinities with silence (0.0).
///
/// Upstream calibration can produce non-finite values from garbage input;
/// they must never reach the quantizer, the envelope or the output buffer.
#[inline]
pub fn sanitize(x: f32) -> f32 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_passes_finite_values() {
        assert_eq!(sanitize(0.25), 0.25);
        assert_eq!(sanitize(-1.0e30), -1.0e30);
    }

    #[test]
    fn sanitize_zeroes_non_finite() {
        assert_eq!(sanitize(f32::NAN), 0.0);
        assert_eq!(sanitize(f32::INFINITY), 0.0);
        assert_eq!(sanitize(f32::NEG_INFINITY), 0.0);
    }
}
