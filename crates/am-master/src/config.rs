use std::path::PathBuf;

use am_audio::OutputRequest;
use am_dsp::{DEFAULT_DEVICE_CHANNELS, DEFAULT_DURATION_SECS, DEFAULT_FADE_SECS, SAMPLE_RATE};

/// Startup settings for the mixer and its asset loader.
#[derive(Clone, Debug, PartialEq)]
pub struct MixerConfig {
    /// Directory searched for each profile's WAV file.
    pub sounds_dir: PathBuf,
    pub sample_rate: u32,
    /// Length of synthesized loops.
    pub duration_secs: f32,
    pub fade_secs: f32,
    /// Channel count asked of the device and used for synthesized assets.
    pub requested_channels: u16,
    /// Gain every channel starts at.
    pub initial_gain: f32,
    /// Fixed RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            sounds_dir: PathBuf::from("sounds-wav"),
            sample_rate: SAMPLE_RATE,
            duration_secs: DEFAULT_DURATION_SECS,
            fade_secs: DEFAULT_FADE_SECS,
            requested_channels: DEFAULT_DEVICE_CHANNELS,
            initial_gain: 0.5,
            seed: None,
        }
    }
}

impl MixerConfig {
    pub fn output_request(&self) -> OutputRequest {
        OutputRequest {
            sample_rate: self.sample_rate,
            channels: self.requested_channels,
        }
    }
}
