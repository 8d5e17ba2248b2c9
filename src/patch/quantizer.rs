//! Quantizer with hold.
//!
//! Inputs, outputs:
//! - In, left: volt/octave pitch, in the input jack's calibrated sample domain.
//! - Button A: hold. While pressed, the output freezes on the last sample
//!   produced before the press.
//! - Parameter A: transposition in volts (snapped to semitones).
//! - Out, left: quantized volt/octave pitch, in the output jack's domain.

use super::{ButtonId, NonFiniteReport, ParameterId, Patch};
use crate::{
    dsp::{sanitize, CalibrationConstants, Scale, ScaleQuantizer, VoltageCalibration},
    io::{AudioBuffer, Channel},
};

pub struct QuantizerPatch {
    quantizer: ScaleQuantizer,
    calib_in: VoltageCalibration,
    calib_out: VoltageCalibration,
    /// Output sample repeated while holding.
    last_sample: f32,
    holding: bool,
    non_finite: NonFiniteReport,
}

impl QuantizerPatch {
    pub fn new(input: CalibrationConstants, output: CalibrationConstants) -> Self {
        let calib_out = VoltageCalibration::output(output);
        log::debug!("quantizer patch: input {input:?}, output {output:?}");

        Self {
            quantizer: ScaleQuantizer::new(),
            calib_in: VoltageCalibration::input(input),
            calib_out,
            last_sample: calib_out.volts_to_sample(0.0),
            holding: false,
            non_finite: NonFiniteReport::default(),
        }
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.quantizer.set_scale(scale);
        self
    }

    pub fn set_hold(&mut self, hold: bool) {
        self.holding = hold;
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn set_offset(&mut self, volts: f32) {
        self.quantizer.set_offset(volts);
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.quantizer.set_scale(scale);
    }

    pub fn quantizer(&self) -> &ScaleQuantizer {
        &self.quantizer
    }

    /// The sample that hold would repeat right now.
    pub fn last_sample(&self) -> f32 {
        self.last_sample
    }

    /// Quantize one block of samples in place.
    pub fn process_block(&mut self, samples: &mut [f32]) {
        if self.holding {
            samples.fill(self.last_sample);
            return;
        }

        for sample in samples.iter_mut() {
            let volts = self.calib_in.sample_to_volts(*sample);
            self.non_finite.check("quantizer", volts);

            let quantized = self.quantizer.process(sanitize(volts));
            *sample = sanitize(self.calib_out.volts_to_sample(quantized));
        }

        if let Some(&last) = samples.last() {
            self.last_sample = last;
        }
    }
}

impl Default for QuantizerPatch {
    fn default() -> Self {
        Self::new(CalibrationConstants::default(), CalibrationConstants::default())
    }
}

impl Patch for QuantizerPatch {
    fn process_audio(&mut self, buffer: &mut AudioBuffer) {
        self.process_block(buffer.samples_mut(Channel::Left));
    }

    fn button_changed(&mut self, id: ButtonId, value: u16, _sample_offset: u16) {
        if id == ButtonId::A {
            self.set_hold(value > 0);
        }
    }

    fn set_parameter(&mut self, id: ParameterId, value: f32) {
        if id == ParameterId::A {
            self.set_offset(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEMITONE: f32 = 1.0 / 12.0;

    /// Unity calibration so samples are volts.
    fn unity_patch() -> QuantizerPatch {
        let unity = CalibrationConstants::new(1.0, 0.0);
        QuantizerPatch::new(unity, unity)
    }

    #[test]
    fn quantizes_every_sample_of_the_block() {
        let mut patch = unity_patch();
        let mut block = [0.03, 0.05, 0.99, -0.05];
        patch.process_block(&mut block);

        assert_eq!(block[0], 0.0);
        assert!((block[1] - SEMITONE).abs() < 1e-6);
        assert!((block[2] - 1.0).abs() < 1e-6);
        assert!((block[3] + SEMITONE).abs() < 1e-6);
    }

    #[test]
    fn calibration_is_applied_both_ways() {
        let mut patch = QuantizerPatch::default();
        // 0.202 * 5 V = 1.01 V -> 1.0 V -> 0.2 in the ±5 V domain
        let mut block = [0.202];
        patch.process_block(&mut block);
        assert!((block[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn hold_repeats_last_sample_until_released() {
        let mut patch = unity_patch();

        let mut block = [0.1, 0.3, 0.52];
        patch.process_block(&mut block);
        let held = block[2];

        patch.button_changed(ButtonId::A, 1, 0);
        for input in [[2.0, 3.0, 4.0], [-1.0, 0.0, 7.0]] {
            let mut block = input;
            patch.process_block(&mut block);
            assert!(block.iter().all(|&s| s == held));
        }

        patch.button_changed(ButtonId::A, 0, 0);
        let mut block = [2.0, 2.0, 2.0];
        patch.process_block(&mut block);
        assert!(block.iter().all(|&s| s == 2.0));
        assert_eq!(patch.last_sample(), 2.0);
    }

    #[test]
    fn hold_before_any_audio_outputs_zero_volts() {
        let mut patch = QuantizerPatch::new(
            CalibrationConstants::default(),
            CalibrationConstants::new(4.0, 0.4),
        );
        patch.set_hold(true);
        let mut block = [0.7; 4];
        patch.process_block(&mut block);
        assert!(block.iter().all(|&s| (s + 0.1).abs() < 1e-6));
    }

    #[test]
    fn non_finite_input_becomes_zero_volts() {
        let mut patch = unity_patch();
        let mut block = [f32::NAN, f32::INFINITY, 0.5];
        patch.process_block(&mut block);
        assert_eq!(block[0], 0.0);
        assert_eq!(block[1], 0.0);
        assert!((block[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn offset_parameter_transposes_by_semitones() {
        let mut patch = unity_patch();
        patch.set_parameter(ParameterId::A, 0.16);
        let mut block = [0.0];
        patch.process_block(&mut block);
        assert!((block[0] - 2.0 * SEMITONE).abs() < 1e-6);
    }
}
