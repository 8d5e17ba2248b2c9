/*
Pitch Quantization
==================

A quantizer snaps a continuously varying pitch voltage onto the nearest note
of a scale, turning a slow LFO or a wobbly knob into in-tune steps.

Vocabulary
----------

  volt/octave   1 V of change = 1 octave = 12 semitones.
                So one semitone is 1/12 V ≈ 83.3 mV.

  grid          The set of voltages n/12 for integer n. Every note of the
                12-tone equal-tempered scale sits on the grid.

  scale         A subset of the 12 grid positions in each octave. Chromatic
                allows all 12; major allows 7; pentatonic 5.

  offset        A transposition added after quantizing. It is itself
                quantized so the output stays on the grid.


The Math
--------

    n   = round(volts * 12)      nearest semitone index
    out = n / 12                 back to volts

`round` here is round-half-away-from-zero:

    volts   volts*12   n
    0.03    0.36       0     (C)
    0.05    0.60       1     (C#, 0.0833 V)
    0.125   1.50       2     (tie, away from zero)
   -0.125  -1.50      -2     (tie, away from zero)

Truncating after adding 0.5 agrees with this for positive input but sends
negative ties toward zero (-1.5 + 0.5 = -1.0 -> -1). We round symmetrically.

The semitone index is clamped to ±2^24 before the integer conversion. Above
that f32 can no longer represent every integer, and a few orders of magnitude
further the cast would saturate anyway; clamping keeps the result exact and
finite for any finite input.


Non-chromatic Scales
--------------------

For a scale, the chromatic note is found first and then moved to the closest
allowed degree, searching outward one semitone at a time (upward first, so
ties resolve up). The search wraps across octaves: B is one semitone below
the next C.

    C  C# D  D# E  F  F# G  G# A  A# B
    ●  ·  ●  ·  ●  ●  ·  ●  ·  ●  ·  ●    major
       └→ D (tie between C and D goes up)
*/

use super::{processor::SignalProcessor, sanitize};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const SEMITONES_PER_OCTAVE: i32 = 12;

/// Largest semitone index magnitude kept exact in f32 (2^24).
const MAX_SEMITONE_INDEX: f32 = 16_777_216.0;

/// Musical scales on the 12-tone grid.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    Chromatic,
    Major,
    Minor,
    PentatonicMajor,
    PentatonicMinor,
    Dorian,
    Mixolydian,
    Blues,
}

impl Scale {
    /// Allowed notes as a bitfield, bit 0 = root ... bit 11 = major seventh.
    const fn mask(self) -> u16 {
        match self {
            Scale::Chromatic => 0b1111_1111_1111,
            Scale::Major => 0b1010_1011_0101,
            Scale::Minor => 0b0101_1010_1101,
            Scale::PentatonicMajor => 0b0010_1001_0101,
            Scale::PentatonicMinor => 0b0100_1010_1001,
            Scale::Dorian => 0b0110_1010_1101,
            Scale::Mixolydian => 0b0110_1011_0101,
            Scale::Blues => 0b0100_1110_1001,
        }
    }

    /// Whether `semitone` (any integer, wrapped into the octave) is in the scale.
    pub fn contains(self, semitone: i32) -> bool {
        let degree = semitone.rem_euclid(SEMITONES_PER_OCTAVE);
        self.mask() & (1 << degree) != 0
    }

    /// Move a chromatic note index to the nearest note of this scale.
    fn snap(self, note: i32) -> i32 {
        if matches!(self, Scale::Chromatic) {
            return note;
        }

        // Every scale has a root, so the search ends within half an octave.
        for distance in 0..=SEMITONES_PER_OCTAVE / 2 {
            if self.contains(note + distance) {
                return note + distance;
            }
            if self.contains(note - distance) {
                return note - distance;
            }
        }
        note
    }
}

/// Nearest semitone index for a pitch voltage (round half away from zero).
#[inline]
pub fn nearest_semitone(volts: f32) -> i32 {
    let semitones = sanitize(volts) * SEMITONES_PER_OCTAVE as f32;
    semitones
        .round()
        .clamp(-MAX_SEMITONE_INDEX, MAX_SEMITONE_INDEX) as i32
}

/// Snaps pitch voltages to a 12-tone scale, then adds a grid-aligned offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleQuantizer {
    scale: Scale,
    offset_volts: f32,
}

impl ScaleQuantizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale(scale: Scale) -> Self {
        Self {
            scale,
            offset_volts: 0.0,
        }
    }

    /// Quantize without the offset. Pure and total.
    #[inline]
    pub fn quantize(&self, input_volts: f32) -> f32 {
        let note = self.scale.snap(nearest_semitone(input_volts));
        note as f32 / SEMITONES_PER_OCTAVE as f32
    }

    /// Set a transposition, applied after quantizing.
    ///
    /// The offset is rounded to the chromatic grid so that transposing never
    /// pulls the output off the grid.
    pub fn set_offset(&mut self, volts: f32) {
        self.offset_volts = nearest_semitone(volts) as f32 / SEMITONES_PER_OCTAVE as f32;
    }

    pub fn offset(&self) -> f32 {
        self.offset_volts
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    #[inline]
    pub fn process(&self, input_volts: f32) -> f32 {
        self.quantize(input_volts) + self.offset_volts
    }
}

impl SignalProcessor for ScaleQuantizer {
    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        self.process(input)
    }
}
