//! Voltage-controlled oscillator with an AR envelope.
//!
//! Inputs, outputs:
//! - In, left: volt/octave pitch. Only the first sample of each block is
//!   read; pitch is control-rate, the waveform is audio-rate.
//! - Button A: gate. Press starts the attack, release starts the release.
//! - Parameter A: detune (volts), B: attack (s), C: release (s).
//! - Out, left: the enveloped waveform.
//!
//! Per block:
//!
//!   left[0] ─→ volts ─→ Hz ─→ oscillator.generate(left) ─→ envelope(left)

use super::{ButtonId, NonFiniteReport, ParameterId, Patch};
use crate::{
    dsp::{
        sanitize, CalibrationConstants, EnvelopeStage, FrequencyMapper, Oscillator,
        OscillatorBlock, OscillatorWaveform, ScaleQuantizer, SignalProcessor, TuningConfig,
        VoltageCalibration,
    },
    io::{AudioBuffer, Channel},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest attack or release the knobs can ask for.
pub const MAX_STAGE_SECONDS: f32 = 4.0;

/// Whether the detune knob moves continuously or in semitone steps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetuneMode {
    #[default]
    Continuous,
    Quantized,
}

/// Knob values, read once per block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    pub detune: f32,
    pub attack: f32,
    pub release: f32,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            detune: 0.0,
            attack: 0.01,
            release: 0.3,
        }
    }
}

pub struct OscillatorPatch<O = OscillatorBlock> {
    calibration: VoltageCalibration,
    mapper: FrequencyMapper,
    detune_quantizer: ScaleQuantizer,
    detune_mode: DetuneMode,
    oscillator: O,
    envelope: EnvelopeStage,
    params: OscillatorParams,
    non_finite: NonFiniteReport,
}

impl OscillatorPatch<OscillatorBlock> {
    /// Square-wave patch, as on the hardware.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_waveform(sample_rate, OscillatorWaveform::Square)
    }

    pub fn with_waveform(sample_rate: f32, waveform: OscillatorWaveform) -> Self {
        Self::with_oscillator(sample_rate, OscillatorBlock::new(waveform, sample_rate))
    }
}

impl<O: Oscillator> OscillatorPatch<O> {
    pub fn with_oscillator(sample_rate: f32, oscillator: O) -> Self {
        let params = OscillatorParams::default();
        log::debug!("oscillator patch at {sample_rate} Hz");

        Self {
            calibration: VoltageCalibration::default(),
            mapper: FrequencyMapper::default(),
            detune_quantizer: ScaleQuantizer::new(),
            detune_mode: DetuneMode::default(),
            oscillator,
            envelope: EnvelopeStage::ar(sample_rate, params.attack, params.release),
            params,
            non_finite: NonFiniteReport::default(),
        }
    }

    pub fn with_tuning(mut self, tuning: TuningConfig) -> Self {
        self.mapper = FrequencyMapper::new(tuning);
        self
    }

    pub fn with_calibration(mut self, constants: CalibrationConstants) -> Self {
        self.calibration = VoltageCalibration::input(constants);
        self
    }

    pub fn with_detune_mode(mut self, mode: DetuneMode) -> Self {
        self.detune_mode = mode;
        self
    }

    pub fn with_params(mut self, params: OscillatorParams) -> Self {
        self.set_detune(params.detune);
        self.set_attack(params.attack);
        self.set_release(params.release);
        self
    }

    pub fn set_detune(&mut self, volts: f32) {
        self.params.detune = sanitize(volts);
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.params.attack = sanitize(seconds).clamp(0.0, MAX_STAGE_SECONDS);
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.params.release = sanitize(seconds).clamp(0.0, MAX_STAGE_SECONDS);
    }

    /// Gate events take effect immediately, independent of block boundaries.
    pub fn gate(&mut self, on: bool) {
        self.envelope.gate(on);
    }

    pub fn params(&self) -> OscillatorParams {
        self.params
    }

    pub fn envelope(&self) -> &EnvelopeStage {
        &self.envelope
    }

    /// Frequency the oscillator is currently running at.
    pub fn frequency(&self) -> f32 {
        self.oscillator.frequency()
    }

    fn effective_detune(&self) -> f32 {
        match self.detune_mode {
            DetuneMode::Continuous => self.params.detune,
            DetuneMode::Quantized => self.detune_quantizer.quantize(self.params.detune),
        }
    }

    /// Block-rate parameter update from the block's pitch voltage.
    fn handle_parameters(&mut self, volts: f32) {
        let frequency = self
            .mapper
            .voltage_to_frequency(volts, self.effective_detune());
        self.oscillator.set_frequency(frequency);

        // Only touch the envelope on change so a running ramp isn't re-anchored
        // every block.
        if self.envelope.attack() != self.params.attack {
            self.envelope.set_attack(self.params.attack);
        }
        if self.envelope.release() != self.params.release {
            self.envelope.set_release(self.params.release);
        }
    }

    /// Render one block in place; `samples[0]` carries the pitch CV.
    pub fn process_block(&mut self, samples: &mut [f32]) {
        let Some(&first) = samples.first() else {
            return;
        };

        let volts = self.calibration.sample_to_volts(first);
        self.non_finite.check("oscillator", volts);
        self.handle_parameters(sanitize(volts));

        self.oscillator.generate(samples);
        self.envelope.process_in_place(samples);
    }
}

impl<O: Oscillator> Patch for OscillatorPatch<O> {
    fn process_audio(&mut self, buffer: &mut AudioBuffer) {
        self.process_block(buffer.samples_mut(Channel::Left));
    }

    fn button_changed(&mut self, id: ButtonId, value: u16, _sample_offset: u16) {
        if id == ButtonId::A {
            self.gate(value > 0);
        }
    }

    fn set_parameter(&mut self, id: ParameterId, value: f32) {
        match id {
            ParameterId::A => self.set_detune(value),
            ParameterId::B => self.set_attack(value),
            ParameterId::C => self.set_release(value),
            ParameterId::D => {}
        }
    }
}
