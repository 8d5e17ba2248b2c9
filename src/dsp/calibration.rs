/*
Volt-per-Octave Calibration
===========================

The host hands us samples in a normalized domain (nominally -1.0 to +1.0), but
pitch lives in volts: one volt per octave, 1/12 V per semitone. The analog
front end between the jack and the converter has its own gain and DC offset,
so every channel carries a pair of measured constants.

    volts  = sample * scale + offset        (ToVolts, input jacks)
    sample = (volts - offset) / scale       (ToSample, output jacks)

Both directions are the same straight line read the other way, so a
calibration built for one direction can always answer the other question too.
The `direction` only says which one is the "forward" transform this instance
was constructed for; `sample_to_volts` and `volts_to_sample` are exact
inverses regardless.

  Volts
    +5 ┤                 ╱
       │              ╱
     0 ┼───────────╳──────── sample
       │        ╱  ↑
    -5 ┤     ╱     offset (volts at sample = 0)
          -1.0     0      +1.0
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest usable scale magnitude. Anything below would blow up the inverse.
const MIN_SCALE: f32 = 1.0e-6;

/// Measured constants for one physical channel.
///
/// Always expressed in the ToVolts sense: `volts = sample * scale + offset`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConstants {
    pub scale: f32,
    pub offset: f32,
}

impl CalibrationConstants {
    pub const fn new(scale: f32, offset: f32) -> Self {
        Self { scale, offset }
    }

    /// True when the constants describe an invertible mapping.
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite() && self.offset.is_finite() && self.scale.abs() >= MIN_SCALE
    }
}

impl Default for CalibrationConstants {
    /// Nominal front end: full scale ±1.0 maps to ±5 V, no offset.
    fn default() -> Self {
        Self::new(5.0, 0.0)
    }
}

/// Which transform a calibration instance was built to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Input jack: sample -> volts.
    ToVolts,
    /// Output jack: volts -> sample.
    ToSample,
}

/// Affine sample/volt mapping, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct VoltageCalibration {
    scale: f32,
    offset: f32,
    inv_scale: f32,
    direction: Direction,
}

impl VoltageCalibration {
    pub fn new(constants: CalibrationConstants, direction: Direction) -> Self {
        let constants = if constants.is_valid() {
            constants
        } else {
            log::warn!(
                "unusable calibration constants {:?}, falling back to defaults",
                constants
            );
            CalibrationConstants::default()
        };

        Self {
            scale: constants.scale,
            offset: constants.offset,
            inv_scale: 1.0 / constants.scale,
            direction,
        }
    }

    /// Calibration for an input jack (sample -> volts).
    pub fn input(constants: CalibrationConstants) -> Self {
        Self::new(constants, Direction::ToVolts)
    }

    /// Calibration for an output jack (volts -> sample).
    pub fn output(constants: CalibrationConstants) -> Self {
        Self::new(constants, Direction::ToSample)
    }

    #[inline]
    pub fn sample_to_volts(&self, sample: f32) -> f32 {
        sample * self.scale + self.offset
    }

    #[inline]
    pub fn volts_to_sample(&self, volts: f32) -> f32 {
        (volts - self.offset) * self.inv_scale
    }

    /// Apply the forward transform for this instance's direction.
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        match self.direction {
            Direction::ToVolts => self.sample_to_volts(x),
            Direction::ToSample => self.volts_to_sample(x),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn constants(&self) -> CalibrationConstants {
        CalibrationConstants::new(self.scale, self.offset)
    }
}

impl Default for VoltageCalibration {
    fn default() -> Self {
        Self::input(CalibrationConstants::default())
    }
}
