//! Host-facing patch compositions.
//!
//! A patch owns its DSP primitives outright and exposes the three entry points
//! a host drives: one audio block at a time, button/gate events, and knob
//! parameters. The host serializes these calls per patch instance, so nothing
//! here locks. For hosts that deliver events from another thread, wrap the
//! patch in [`control::SharedPatch`] and send events through its handle.

#[cfg(feature = "rtrb")]
pub mod control;
pub mod oscillator;
pub mod quantizer;

pub use oscillator::{DetuneMode, OscillatorParams, OscillatorPatch};
pub use quantizer::QuantizerPatch;

use crate::io::AudioBuffer;

/// Push buttons / trigger inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    A,
    B,
    C,
    D,
}

/// Host-scaled knob parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterId {
    A,
    B,
    C,
    D,
}

/// Core trait for patches driven by an audio host
pub trait Patch: Send {
    /// Process one block in place.
    fn process_audio(&mut self, buffer: &mut AudioBuffer);

    /// A button or trigger changed. `value > 0` means pressed / gate high.
    ///
    /// `sample_offset` is the host's hint of where in the current block the
    /// edge happened. Patches apply events at block granularity and ignore it.
    fn button_changed(&mut self, _id: ButtonId, _value: u16, _sample_offset: u16) {
        // Default: no buttons
    }

    /// A knob moved. Values arrive already scaled by the host.
    fn set_parameter(&mut self, _id: ParameterId, _value: f32) {
        // Default: no parameters
    }
}

/// Allow boxed patches to be used as patches (for dynamic dispatch)
impl Patch for Box<dyn Patch> {
    fn process_audio(&mut self, buffer: &mut AudioBuffer) {
        (**self).process_audio(buffer)
    }

    fn button_changed(&mut self, id: ButtonId, value: u16, sample_offset: u16) {
        (**self).button_changed(id, value, sample_offset)
    }

    fn set_parameter(&mut self, id: ParameterId, value: f32) {
        (**self).set_parameter(id, value)
    }
}

/// Latches the first non-finite sample a patch sees so it is logged once,
/// not once per sample.
#[derive(Debug, Default)]
pub(crate) struct NonFiniteReport {
    reported: bool,
}

impl NonFiniteReport {
    #[inline]
    pub(crate) fn check(&mut self, patch: &'static str, value: f32) {
        if !value.is_finite() && !self.reported {
            self.reported = true;
            log::warn!("{patch}: non-finite input {value} replaced with 0");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Channel;

    /// Drives any patch the way a host does: events first, then the block.
    fn host_block<P: Patch>(patch: &mut P, buffer: &mut AudioBuffer) {
        patch.button_changed(ButtonId::A, 1, 0);
        patch.set_parameter(ParameterId::A, 0.0);
        patch.process_audio(buffer);
    }

    #[test]
    fn boxed_patches_are_driven_through_the_trait() {
        let mut patches: Vec<Box<dyn Patch>> = vec![
            Box::new(QuantizerPatch::default()),
            Box::new(OscillatorPatch::new(48_000.0)),
        ];

        for patch in patches.iter_mut() {
            let mut buffer = AudioBuffer::new(1, 64);
            buffer.fill(0.3);
            host_block(patch, &mut buffer);
            assert!(buffer
                .samples(Channel::Left)
                .iter()
                .all(|s| s.is_finite() && s.abs() <= 1.0));
        }

        // Hold pressed before any audio: quantizer repeats 0 V.
        let mut buffer = AudioBuffer::new(1, 8);
        buffer.fill(0.3);
        host_block(&mut patches[0], &mut buffer);
        assert!(buffer.samples(Channel::Left).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn non_finite_report_latches() {
        let mut report = NonFiniteReport::default();
        report.check("test", 1.0);
        assert!(!report.reported);
        report.check("test", f32::NAN);
        report.check("test", f32::INFINITY);
        assert!(report.reported);
    }
}
