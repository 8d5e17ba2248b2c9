/// A processor that transforms one signal into another, sample by sample.
///
/// Implementors provide the single-sample path; the block paths default to
/// looping over it. Stateful processors (the envelope) advance once per
/// sample, stateless ones (the quantizer) just map values.
pub trait SignalProcessor: Send {
    fn process_sample(&mut self, input: f32) -> f32;

    /// Process `input` into `output`. Only the overlapping length is touched.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        for (out, &x) in output.iter_mut().zip(input.iter()) {
            *out = self.process_sample(x);
        }
    }

    fn process_in_place(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}

/// Allow boxed processors to be used as processors (for dynamic dispatch)
impl SignalProcessor for Box<dyn SignalProcessor> {
    fn process_sample(&mut self, input: f32) -> f32 {
        (**self).process_sample(input)
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        (**self).process_block(input, output)
    }

    fn process_in_place(&mut self, buffer: &mut [f32]) {
        (**self).process_in_place(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{EnvelopeStage, ScaleQuantizer};

    /// Runs every stage in order over `buffer`.
    fn run_chain<P: SignalProcessor>(chain: &mut [P], buffer: &mut [f32]) {
        for stage in chain.iter_mut() {
            stage.process_in_place(buffer);
        }
    }

    #[test]
    fn boxed_processors_chain_through_one_interface() {
        let mut envelope = EnvelopeStage::ar(1_000.0, 0.0, 1.0);
        envelope.gate(true);

        let mut chain: Vec<Box<dyn SignalProcessor>> =
            vec![Box::new(ScaleQuantizer::new()), Box::new(envelope)];

        let mut buffer = [0.03, 0.05, 0.125, f32::NAN];
        run_chain(&mut chain, &mut buffer);

        assert_eq!(buffer[0], 0.0);
        assert!((buffer[1] - 1.0 / 12.0).abs() < 1e-6);
        assert!((buffer[2] - 2.0 / 12.0).abs() < 1e-6);
        assert_eq!(buffer[3], 0.0);

        let input = [0.26, -0.26];
        let mut output = [9.0; 2];
        chain[0].process_block(&input, &mut output);
        assert!((output[0] - 0.25).abs() < 1e-6);
        assert!((output[1] + 0.25).abs() < 1e-6);
        assert!((chain[1].process_sample(0.5) - 0.5).abs() < 1e-6);
    }
}
