//! AmbientMixer: owns the device and the asset bank, routes volume events.

use std::fmt;
use std::sync::Arc;

use am_audio::{AudioError, AudioOutput, CpalOutput};
use am_dsp::DEFAULT_DEVICE_CHANNELS;
use am_engine::{ChannelControl, Engine, PlaybackState, MAX_CHANNELS};
use slotmap::SlotMap;

use crate::asset::{AssetLoader, Diagnostic, SoundAsset};
use crate::config::MixerConfig;
use crate::profile::SoundProfile;

slotmap::new_key_type! {
    /// Key for referencing assets in the mixer's asset bank.
    pub struct AssetKey;
}

/// Error type for mixer startup.
#[derive(Debug)]
pub enum MixerError {
    /// The audio device could not be opened or started
    DeviceInit(AudioError),
}

impl fmt::Display for MixerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixerError::DeviceInit(e) => write!(f, "Audio device initialization failed: {}", e),
        }
    }
}

impl std::error::Error for MixerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MixerError::DeviceInit(e) => Some(e),
        }
    }
}

/// A slider moved: `value` is on the 0..=100 scale.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeChanged {
    pub channel: String,
    pub value: f32,
}

impl VolumeChanged {
    pub fn new(channel: impl Into<String>, value: f32) -> Self {
        Self {
            channel: channel.into(),
            value,
        }
    }
}

/// One looping slot bound to an asset in the bank.
#[derive(Debug)]
pub struct MixerChannel {
    name: String,
    asset: AssetKey,
    control: Arc<ChannelControl>,
}

impl MixerChannel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn asset_key(&self) -> AssetKey {
        self.asset
    }

    pub fn gain(&self) -> f32 {
        self.control.gain()
    }

    pub fn state(&self) -> PlaybackState {
        self.control.state()
    }
}

/// Eight-channel looping ambient mixer.
pub struct AmbientMixer<O: AudioOutput> {
    output: O,
    /// Asset bank (owns all sample data).
    assets: SlotMap<AssetKey, SoundAsset>,
    channels: Vec<MixerChannel>,
    diagnostics: Vec<Diagnostic>,
    running: bool,
}

impl AmbientMixer<CpalOutput> {
    /// Open the default output device and start every profile looping.
    pub fn open_default(
        profiles: &[SoundProfile],
        config: &MixerConfig,
    ) -> Result<Self, MixerError> {
        let output =
            CpalOutput::open(config.output_request()).map_err(MixerError::DeviceInit)?;
        Self::initialize(output, profiles, config)
    }
}

impl<O: AudioOutput> AmbientMixer<O> {
    /// Build an asset per profile, bind each to a channel at the initial gain
    /// and start them all looping on `output`.
    ///
    /// Asset problems are recovered and kept in [`AmbientMixer::diagnostics`];
    /// only a device that will not start is an error.
    pub fn initialize(
        mut output: O,
        profiles: &[SoundProfile],
        config: &MixerConfig,
    ) -> Result<Self, MixerError> {
        let reported = output.channels();
        let device_channels = reported.unwrap_or(DEFAULT_DEVICE_CHANNELS);
        let device_rate = output.sample_rate();
        if device_rate != config.sample_rate {
            log::info!(
                "Device opened at {}Hz instead of {}Hz; building assets at the device rate",
                device_rate,
                config.sample_rate
            );
        }
        let device_config = MixerConfig {
            sample_rate: device_rate,
            ..config.clone()
        };
        let mut loader = AssetLoader::new(&device_config, reported);
        let mut engine = Engine::new(device_channels);

        let mut assets = SlotMap::with_key();
        let mut channels = Vec::with_capacity(profiles.len().min(MAX_CHANNELS));
        let mut diagnostics = Vec::new();

        for profile in profiles {
            if channels.len() == MAX_CHANNELS {
                log::warn!("Mixer is full; skipping profile {}", profile.name);
                continue;
            }
            if channels.iter().any(|c: &MixerChannel| c.name == profile.name) {
                log::warn!("Duplicate profile name {}; skipping", profile.name);
                continue;
            }
            let mut outcome = loader.load_or_synthesize(profile);
            diagnostics.append(&mut outcome.diagnostics);

            let control = Arc::new(ChannelControl::new(config.initial_gain));
            if engine
                .add_voice(outcome.asset.buffer().clone(), control.clone())
                .is_err()
            {
                continue;
            }
            let asset = assets.insert(outcome.asset);
            channels.push(MixerChannel {
                name: profile.name.clone(),
                asset,
                control,
            });
        }

        output.start(engine).map_err(MixerError::DeviceInit)?;
        for channel in &channels {
            channel.control.start_loop();
        }
        log::info!(
            "Mixer started: {} channel(s) on {} device channel(s), {} diagnostic(s)",
            channels.len(),
            device_channels,
            diagnostics.len()
        );

        Ok(Self {
            output,
            assets,
            channels,
            diagnostics,
            running: true,
        })
    }

    /// Apply a slider event. Returns the percentage now in effect, or `None`
    /// if no channel has that name.
    pub fn volume_changed(&self, event: &VolumeChanged) -> Option<u8> {
        self.set_gain(&event.channel, event.value)
    }

    /// Set `name`'s gain from a 0..=100 value (clamped; NaN counts as 0).
    pub fn set_gain(&self, name: &str, raw: f32) -> Option<u8> {
        let Some(channel) = self.channel(name) else {
            log::trace!("Ignoring volume change for unknown channel {:?}", name);
            return None;
        };
        let gain = channel.control.set_gain(raw / 100.0);
        let percent = to_percent(gain);
        log::debug!("{} -> {}%", name, percent);
        Some(percent)
    }

    pub fn current_gain(&self, name: &str) -> Option<f32> {
        self.channel(name).map(MixerChannel::gain)
    }

    pub fn gain_percent(&self, name: &str) -> Option<u8> {
        self.current_gain(name).map(to_percent)
    }

    pub fn playback_state(&self, name: &str) -> Option<PlaybackState> {
        self.channel(name).map(MixerChannel::state)
    }

    pub fn channel(&self, name: &str) -> Option<&MixerChannel> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn channels(&self) -> &[MixerChannel] {
        &self.channels
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.channels.iter().map(|c| c.name.as_str())
    }

    /// The asset bound to `name`. Gone once the mixer has shut down.
    pub fn asset(&self, name: &str) -> Option<&SoundAsset> {
        self.assets.get(self.channel(name)?.asset)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Stop every channel, release the device and drop the assets.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        for channel in &self.channels {
            channel.control.stop();
        }
        if let Err(e) = self.output.stop() {
            log::warn!("Error stopping audio output: {}", e);
        }
        self.assets.clear();
        log::info!("Mixer shut down");
    }
}

impl<O: AudioOutput> Drop for AmbientMixer<O> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn to_percent(gain: f32) -> u8 {
    (gain * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Procedural;
    use am_audio::NullOutput;
    use am_dsp::GeneratorId;

    fn config() -> MixerConfig {
        MixerConfig {
            sounds_dir: "/nonexistent/ambimix-sounds".into(),
            duration_secs: 0.01,
            seed: Some(3),
            ..MixerConfig::default()
        }
    }

    fn profiles(n: usize) -> Vec<SoundProfile> {
        (0..n)
            .map(|i| {
                SoundProfile::new(
                    format!("P{}", i),
                    format!("p{}.wav", i),
                    Procedural::new(GeneratorId::WhiteNoise, 1),
                )
            })
            .collect()
    }

    fn mixer(n: usize) -> AmbientMixer<NullOutput> {
        AmbientMixer::initialize(NullOutput::new(44_100, Some(2)), &profiles(n), &config()).unwrap()
    }

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(to_percent(0.5), 50);
        assert_eq!(to_percent(0.756), 76);
        assert_eq!(to_percent(0.754), 75);
        assert_eq!(to_percent(0.0), 0);
        assert_eq!(to_percent(1.0), 100);
    }

    #[test]
    fn channels_start_looping_at_half_gain() {
        let m = mixer(3);
        assert_eq!(m.channel_names().collect::<Vec<_>>(), vec!["P0", "P1", "P2"]);
        for name in ["P0", "P1", "P2"] {
            assert_eq!(m.current_gain(name), Some(0.5));
            assert_eq!(m.playback_state(name), Some(PlaybackState::Looping));
        }
        assert!(m.output().is_running());
    }

    #[test]
    fn nan_volume_is_zero() {
        let m = mixer(1);
        assert_eq!(m.set_gain("P0", f32::NAN), Some(0));
        assert_eq!(m.current_gain("P0"), Some(0.0));
    }

    #[test]
    fn extra_profiles_beyond_capacity_are_skipped() {
        let m = mixer(MAX_CHANNELS + 2);
        assert_eq!(m.channels().len(), MAX_CHANNELS);
        assert_eq!(m.set_gain("P9", 10.0), None);
    }

    #[test]
    fn duplicate_names_keep_the_first_profile() {
        let mut dupes = profiles(3);
        dupes[2].name = "P0".to_string();
        let m = AmbientMixer::initialize(NullOutput::new(44_100, Some(2)), &dupes, &config())
            .unwrap();

        assert_eq!(m.channel_names().collect::<Vec<_>>(), vec!["P0", "P1"]);
        assert_eq!(m.set_gain("P0", 20.0), Some(20));
        assert_eq!(m.current_gain("P0"), Some(0.2));
        assert_eq!(m.channels().len(), 2);
    }

    #[test]
    fn assets_follow_the_device_rate() {
        let m = AmbientMixer::initialize(NullOutput::new(48_000, Some(2)), &profiles(2), &config())
            .unwrap();
        for name in ["P0", "P1"] {
            let buffer = m.asset(name).unwrap().buffer();
            assert_eq!(buffer.sample_rate(), m.output().sample_rate());
            assert_eq!(buffer.frames(), 480);
        }
    }

    #[test]
    fn shutdown_releases_assets() {
        let mut m = mixer(2);
        assert!(m.asset("P1").is_some());
        m.shutdown();
        assert!(m.asset("P1").is_none());
        assert!(!m.output().is_running());
        assert_eq!(m.playback_state("P1"), Some(PlaybackState::Stopped));
    }

    #[test]
    fn error_chain_reaches_audio_error() {
        use std::error::Error;
        let err = MixerError::DeviceInit(AudioError::NoDevice);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("No audio device"));
    }
}
