//! Shared state types for UI communication
//!
//! Everything crossing the audio thread is `Copy` and allocation-free.

/// Snapshot published by the audio thread once per block.
#[derive(Clone, Copy, Debug, Default)]
pub struct AudioStatus {
    /// Quantizer output, in volts
    pub quantized_volts: f32,
    /// Oscillator frequency in Hz
    pub frequency: f32,
    /// Envelope level (0.0-1.0)
    pub envelope_level: f32,
    /// Whether the quantizer is holding
    pub holding: bool,
}

/// Static information sent once at startup.
#[derive(Clone, Copy, Debug)]
pub struct SessionInfo {
    pub sample_rate: f32,
    pub channels: usize,
    pub block_size: usize,
}

/// Keyboard-driven pitch CV, in volts.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyboardCv {
    semitones: i32,
}

impl KeyboardCv {
    /// ±5 V, the range of a eurorack pitch jack.
    const RANGE: i32 = 60;

    pub fn step(&mut self, semitones: i32) {
        self.semitones = (self.semitones + semitones).clamp(-Self::RANGE, Self::RANGE);
    }

    pub fn volts(&self) -> f32 {
        self.semitones as f32 / 12.0
    }
}
