//! Patch configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! hardware patch settings. Calibration constants are read once, when a patch
//! is built; nothing here is written back.
//!
//! ```toml
//! sample_rate = 48000.0
//! block_size = 128
//!
//! [tuning]
//! base_tuning_hz = 440.0
//! octave_adjust = 5.0
//! knob_center_adjustment = 0.68
//!
//! [calibration.input]
//! scale = 5.0
//! offset = 0.0
//!
//! [oscillator]
//! waveform = "square"
//! detune_mode = "continuous"
//! attack = 0.01
//! release = 0.3
//!
//! [quantizer]
//! scale = "chromatic"
//! ```

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

use crate::{
    dsp::{CalibrationConstants, OscillatorWaveform, Scale, TuningConfig},
    patch::{DetuneMode, OscillatorParams, OscillatorPatch, QuantizerPatch},
    MAX_BLOCK_SIZE,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{channel} calibration is not invertible: {constants:?}")]
    InvalidCalibration {
        channel: &'static str,
        constants: CalibrationConstants,
    },
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),
    #[error("block size must be between 1 and {max}, got {0}", max = MAX_BLOCK_SIZE)]
    InvalidBlockSize(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub input: CalibrationConstants,
    pub output: CalibrationConstants,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorConfig {
    pub waveform: OscillatorWaveform,
    pub detune_mode: DetuneMode,
    pub detune: f32,
    pub attack: f32,
    pub release: f32,
}

impl OscillatorConfig {
    pub fn params(&self) -> OscillatorParams {
        OscillatorParams {
            detune: self.detune,
            attack: self.attack,
            release: self.release,
        }
    }
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        let params = OscillatorParams::default();
        Self {
            waveform: OscillatorWaveform::default(),
            detune_mode: DetuneMode::default(),
            detune: params.detune,
            attack: params.attack,
            release: params.release,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizerConfig {
    pub scale: Scale,
    pub offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub sample_rate: f32,
    pub block_size: usize,
    pub tuning: TuningConfig,
    pub calibration: CalibrationConfig,
    pub oscillator: OscillatorConfig,
    pub quantizer: QuantizerConfig,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            block_size: 128,
            tuning: TuningConfig::default(),
            calibration: CalibrationConfig::default(),
            oscillator: OscillatorConfig::default(),
            quantizer: QuantizerConfig::default(),
        }
    }
}

impl PatchConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("loading patch config from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(ConfigError::InvalidBlockSize(self.block_size));
        }
        for (channel, constants) in [
            ("input", self.calibration.input),
            ("output", self.calibration.output),
        ] {
            if !constants.is_valid() {
                return Err(ConfigError::InvalidCalibration { channel, constants });
            }
        }
        Ok(())
    }

    pub fn quantizer_patch(&self) -> QuantizerPatch {
        let mut patch = QuantizerPatch::new(self.calibration.input, self.calibration.output)
            .with_scale(self.quantizer.scale);
        patch.set_offset(self.quantizer.offset);
        patch
    }

    pub fn oscillator_patch(&self) -> OscillatorPatch {
        OscillatorPatch::with_waveform(self.sample_rate, self.oscillator.waveform)
            .with_tuning(self.tuning)
            .with_calibration(self.calibration.input)
            .with_detune_mode(self.oscillator.detune_mode)
            .with_params(self.oscillator.params())
    }
}
