//! Offline rendering to WAV

use clap::{Args, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use std::{ops::Range, path::Path, path::PathBuf};

use voct_dsp::{config::PatchConfig, dsp::VoltageCalibration};

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output WAV path
    #[arg(long, short, default_value = "voct.wav")]
    out: PathBuf,

    /// Length of the render in seconds
    #[arg(long, default_value_t = 2.0)]
    duration: f32,
}

#[derive(Subcommand, Debug)]
pub enum RenderPatch {
    /// Enveloped oscillator at a fixed pitch, gate pressed at t = 0
    Oscillator {
        #[command(flatten)]
        output: OutputArgs,

        /// Pitch CV in volts
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        volts: f32,

        /// Seconds before the gate is released
        #[arg(long, default_value_t = 1.0)]
        gate_seconds: f32,
    },
    /// Linear CV sweep through the quantizer
    Quantizer {
        #[command(flatten)]
        output: OutputArgs,

        /// Sweep start in volts
        #[arg(long, default_value_t = -1.0, allow_hyphen_values = true)]
        from: f32,

        /// Sweep end in volts
        #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
        to: f32,

        /// Press hold at this many seconds into the sweep
        #[arg(long)]
        hold_at: Option<f32>,
    },
}

pub fn run(config: &PatchConfig, patch: &RenderPatch) -> EyreResult<()> {
    let (output, samples) = match patch {
        RenderPatch::Oscillator {
            output,
            volts,
            gate_seconds,
        } => (
            output,
            render_oscillator(config, *volts, *gate_seconds, output.duration),
        ),
        RenderPatch::Quantizer {
            output,
            from,
            to,
            hold_at,
        } => (
            output,
            render_quantizer(config, *from, *to, *hold_at, output.duration),
        ),
    };

    write_wav(&output.out, config.sample_rate.round() as u32, &samples)?;
    println!(
        "wrote {} samples ({:.2}s) to {}",
        samples.len(),
        output.duration,
        output.out.display()
    );
    Ok(())
}

fn seconds_to_samples(seconds: f32, sample_rate: f32) -> usize {
    (seconds.max(0.0) * sample_rate).round() as usize
}

/// Block ranges covering `0..total`, cut so that `event` starts a block.
fn blocks(total: usize, block_size: usize, event: Option<usize>) -> impl Iterator<Item = Range<usize>> {
    let mut start = 0;
    std::iter::from_fn(move || {
        if start >= total {
            return None;
        }
        let mut end = (start + block_size).min(total);
        if let Some(at) = event {
            if start < at && at < end {
                end = at;
            }
        }
        let range = start..end;
        start = end;
        Some(range)
    })
}

pub fn render_oscillator(
    config: &PatchConfig,
    volts: f32,
    gate_seconds: f32,
    duration: f32,
) -> Vec<f32> {
    let sr = config.sample_rate;
    let total = seconds_to_samples(duration, sr);
    let release_at = seconds_to_samples(gate_seconds, sr);

    let cv = VoltageCalibration::input(config.calibration.input).volts_to_sample(volts);
    let mut patch = config.oscillator_patch();
    let mut out = vec![0.0f32; total];

    patch.gate(true);
    for range in blocks(total, config.block_size, Some(release_at)) {
        if range.start == release_at {
            patch.gate(false);
        }
        let block = &mut out[range];
        block.fill(cv);
        patch.process_block(block);
    }

    out
}

pub fn render_quantizer(
    config: &PatchConfig,
    from: f32,
    to: f32,
    hold_at: Option<f32>,
    duration: f32,
) -> Vec<f32> {
    let sr = config.sample_rate;
    let total = seconds_to_samples(duration, sr);
    let hold_at = hold_at.map(|s| seconds_to_samples(s, sr));

    let calib_in = VoltageCalibration::input(config.calibration.input);
    let steps = total.saturating_sub(1).max(1) as f32;
    let mut out: Vec<f32> = (0..total)
        .map(|i| calib_in.volts_to_sample(from + (to - from) * i as f32 / steps))
        .collect();

    let mut patch = config.quantizer_patch();
    for range in blocks(total, config.block_size, hold_at) {
        if Some(range.start) == hold_at {
            patch.set_hold(true);
        }
        patch.process_block(&mut out[range]);
    }

    out
}

fn write_wav(path: &Path, sample_rate: u32, samples: &[f32]) -> EyreResult<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize().wrap_err("failed to finalize WAV file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_split_at_event() {
        let ranges: Vec<_> = blocks(10, 4, Some(6)).collect();
        assert_eq!(ranges, vec![0..4, 4..6, 6..10]);

        let ranges: Vec<_> = blocks(5, 4, None).collect();
        assert_eq!(ranges, vec![0..4, 4..5]);
    }

    #[test]
    fn oscillator_render_releases_to_silence() {
        let config = PatchConfig::default();
        let samples = render_oscillator(&config, 0.0, 0.5, 1.0);

        assert_eq!(samples.len(), 48_000);
        assert!(samples[..24_000].iter().any(|s| s.abs() > 0.5));
        // 0.3 s release from the peak is over by 0.8 s
        assert!(samples[40_000..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn quantizer_render_holds_from_hold_point() {
        let config = PatchConfig::default();
        let samples = render_quantizer(&config, -1.0, 1.0, Some(0.5), 1.0);

        let held = samples[23_999];
        assert!(samples[24_000..].iter().all(|&s| s == held));

        // Output domain is ±5 V, so every sample sits on a 1/60 grid.
        for &s in &samples[..24_000] {
            let semis = s * 60.0;
            assert!((semis - semis.round()).abs() < 1e-3, "{s} is off grid");
        }
    }

    #[test]
    fn wav_file_is_mono_float() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.wav");
        write_wav(&path, 48_000, &[0.0, 0.5, -0.5]).expect("write wav");

        let reader = hound::WavReader::open(&path).expect("open wav");
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_format, hound::SampleFormat::Float);
        assert_eq!(reader.len(), 3);
    }
}
