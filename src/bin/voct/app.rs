//! Live playback: keyboard CV → quantizer → oscillator → sound card

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};

use voct_dsp::{
    config::PatchConfig,
    dsp::VoltageCalibration,
    patch::{control::SharedPatch, OscillatorPatch, QuantizerPatch},
};

use super::ui::{AudioStatus, Controls, SessionInfo, UiApp};

const CV_QUEUE_SIZE: usize = 64;
const SCOPE_QUEUE_SIZE: usize = 8192;
const STATUS_QUEUE_SIZE: usize = 16;

/// Everything the audio callback owns.
struct Voice {
    quantizer: SharedPatch<QuantizerPatch>,
    oscillator: SharedPatch<OscillatorPatch>,
    cv_rx: Consumer<f32>,
    /// Keyboard CV in the quantizer's input sample domain.
    cv_sample: f32,
    calib_in: VoltageCalibration,
    calib_out: VoltageCalibration,
    scope_tx: Producer<f32>,
    status_tx: Producer<AudioStatus>,
}

impl Voice {
    fn render(&mut self, block: &mut [f32]) {
        while let Ok(volts) = self.cv_rx.pop() {
            self.cv_sample = self.calib_in.volts_to_sample(volts);
        }

        // Quantizer output is patched straight into the oscillator's pitch input.
        block.fill(self.cv_sample);
        self.quantizer.drain();
        self.quantizer.patch_mut().process_block(block);
        let quantized = block.first().copied().unwrap_or(0.0);

        self.oscillator.drain();
        self.oscillator.patch_mut().process_block(block);

        for &sample in block.iter() {
            if self.scope_tx.push(sample).is_err() {
                break;
            }
        }

        let osc = self.oscillator.patch();
        let _ = self.status_tx.push(AudioStatus {
            quantized_volts: self.calib_out.sample_to_volts(quantized),
            frequency: osc.frequency(),
            envelope_level: osc.envelope().level(),
            holding: self.quantizer.patch().is_holding(),
        });
    }
}

pub fn play(config: &PatchConfig) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let stream_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = stream_config.sample_rate().0 as f32;
    let channels = stream_config.channels() as usize;
    let block_size = config.block_size;
    log::info!("output: {sample_rate} Hz, {channels} channels, block {block_size}");

    // The device decides the rate; everything else comes from the config.
    let config = PatchConfig {
        sample_rate,
        ..*config
    };

    let (quantizer, quantizer_handle) = SharedPatch::new(config.quantizer_patch());
    let (oscillator, oscillator_handle) = SharedPatch::new(
        config
            .oscillator_patch()
            .with_calibration(config.calibration.output),
    );

    let (cv_tx, cv_rx) = RingBuffer::<f32>::new(CV_QUEUE_SIZE);
    let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_QUEUE_SIZE);
    let (status_tx, status_rx) = RingBuffer::<AudioStatus>::new(STATUS_QUEUE_SIZE);

    let calib_in = VoltageCalibration::input(config.calibration.input);
    let mut voice = Voice {
        quantizer,
        oscillator,
        cv_rx,
        cv_sample: calib_in.volts_to_sample(0.0),
        calib_in,
        calib_out: VoltageCalibration::output(config.calibration.output),
        scope_tx,
        status_tx,
    };

    let mut render_buf = vec![0.0f32; block_size];

    let stream = device.build_output_stream(
        &stream_config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames_to_render = (total_frames - frames_written).min(block_size);
                let block = &mut render_buf[..frames_to_render];
                voice.render(block);

                // Copy to output (mono to all channels)
                let out_off = frames_written * channels;
                for (i, &s) in block.iter().enumerate() {
                    let frame = out_off + i * channels;
                    data[frame..frame + channels].fill(s);
                }

                frames_written += frames_to_render;
            }
        },
        |err| log::error!("audio stream error: {err}"),
        None,
    )?;

    stream.play()?;

    let session = SessionInfo {
        sample_rate,
        channels,
        block_size,
    };
    let controls = Controls {
        cv_tx,
        quantizer: quantizer_handle,
        oscillator: oscillator_handle,
    };
    let mut app = UiApp::new(session, controls, scope_rx, status_rx);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    drop(stream);
    result
}
