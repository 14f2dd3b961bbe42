//! Load-or-synthesize: turning a profile into a playable buffer.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use am_dsp::{
    encode_or_mono, shape, ChannelLayoutMismatch, EncodedBuffer, Generator, GeneratorId,
    NoiseGenerator, ShapeConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MixerConfig;
use crate::profile::{AssetSource, Procedural, SoundProfile};

/// Where an asset's samples came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetOrigin {
    File(PathBuf),
    Synthesized(GeneratorId),
    /// A caller-supplied [`Generator`].
    Custom,
}

/// An immutable, playback-ready buffer for one profile.
#[derive(Clone, Debug)]
pub struct SoundAsset {
    name: String,
    buffer: Arc<EncodedBuffer>,
    origin: AssetOrigin,
}

impl SoundAsset {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn buffer(&self) -> &Arc<EncodedBuffer> {
        &self.buffer
    }

    pub fn origin(&self) -> &AssetOrigin {
        &self.origin
    }

    pub fn is_synthesized(&self) -> bool {
        !matches!(self.origin, AssetOrigin::File(_))
    }
}

/// A recoverable problem met while producing an asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    MissingAsset {
        profile: String,
        path: PathBuf,
    },
    DecodeFailure {
        profile: String,
        path: PathBuf,
        cause: String,
    },
    ChannelLayoutMismatch {
        profile: String,
        mismatch: ChannelLayoutMismatch,
    },
    /// The file was kept and plays unresampled.
    SampleRateMismatch {
        profile: String,
        path: PathBuf,
        file_rate: u32,
        device_rate: u32,
    },
}

impl Diagnostic {
    pub fn profile(&self) -> &str {
        match self {
            Diagnostic::MissingAsset { profile, .. }
            | Diagnostic::DecodeFailure { profile, .. }
            | Diagnostic::ChannelLayoutMismatch { profile, .. }
            | Diagnostic::SampleRateMismatch { profile, .. } => profile,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingAsset { profile, path } => write!(
                f,
                "Missing audio file for {}: expected {}",
                profile,
                path.display()
            ),
            Diagnostic::DecodeFailure {
                profile,
                path,
                cause,
            } => write!(
                f,
                "Could not load {} for {}: {}",
                path.display(),
                profile,
                cause
            ),
            Diagnostic::ChannelLayoutMismatch { profile, mismatch } => {
                write!(f, "{}: {}, encoded as mono", profile, mismatch)
            }
            Diagnostic::SampleRateMismatch {
                profile,
                path,
                file_rate,
                device_rate,
            } => write!(
                f,
                "{} for {} is {}Hz, device runs at {}Hz; playing as-is",
                path.display(),
                profile,
                file_rate,
                device_rate
            ),
        }
    }
}

/// An asset plus everything that went wrong producing it.
#[derive(Clone, Debug)]
pub struct LoadOutcome {
    pub asset: SoundAsset,
    pub diagnostics: Vec<Diagnostic>,
}

/// Produces assets for profiles, falling back to synthesis.
pub struct AssetLoader<R = StdRng> {
    sounds_dir: PathBuf,
    /// Rate the output runs at; synthesis targets it and files are checked
    /// against it.
    sample_rate: u32,
    duration_secs: f32,
    fade_secs: f32,
    requested_channels: u16,
    /// Channel count the device reported, if any.
    reported_channels: Option<u16>,
    rng: R,
}

impl AssetLoader<StdRng> {
    pub fn new(config: &MixerConfig, reported_channels: Option<u16>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, reported_channels, rng)
    }
}

impl<R: Rng> AssetLoader<R> {
    pub fn with_rng(config: &MixerConfig, reported_channels: Option<u16>, rng: R) -> Self {
        Self {
            sounds_dir: config.sounds_dir.clone(),
            sample_rate: config.sample_rate,
            duration_secs: config.duration_secs,
            fade_secs: config.fade_secs,
            requested_channels: config.requested_channels,
            reported_channels,
            rng,
        }
    }

    pub fn sounds_dir(&self) -> &Path {
        &self.sounds_dir
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Load the profile's file, or synthesize it if the file is missing or
    /// unreadable. Never fails.
    pub fn load_or_synthesize(&mut self, profile: &SoundProfile) -> LoadOutcome {
        let path = profile.path_in(&self.sounds_dir);
        let mut diagnostics = Vec::new();

        if path.is_file() {
            match self.resolve(&profile.name, &AssetSource::FileBacked(path)) {
                Ok(outcome) => return outcome,
                Err(diagnostic) => report(&mut diagnostics, diagnostic),
            }
        } else {
            report(
                &mut diagnostics,
                Diagnostic::MissingAsset {
                    profile: profile.name.clone(),
                    path,
                },
            );
        }

        let mut outcome = self.synthesize(&profile.name, &profile.procedural);
        diagnostics.append(&mut outcome.diagnostics);
        outcome.diagnostics = diagnostics;
        outcome
    }

    /// Produce an asset from exactly one source. File failures come back as
    /// the error; synthesis always succeeds.
    pub fn resolve(&mut self, name: &str, source: &AssetSource) -> Result<LoadOutcome, Diagnostic> {
        match source {
            AssetSource::FileBacked(path) => self.load_file(name, path),
            AssetSource::Procedural(procedural) => Ok(self.synthesize(name, procedural)),
        }
    }

    /// Run the synthesis pipeline for `procedural`.
    pub fn synthesize(&mut self, name: &str, procedural: &Procedural) -> LoadOutcome {
        let id = procedural.generator;
        let mut generator = NoiseGenerator::new(id, self.sample_rate, &mut self.rng);
        let raw = generator.generate(self.duration_secs);
        self.finish_synthesis(
            name,
            raw,
            procedural.smoothing_window,
            AssetOrigin::Synthesized(id),
        )
    }

    /// Synthesize through a caller-supplied generator.
    pub fn synthesize_with(
        &mut self,
        name: &str,
        generator: &mut dyn Generator,
        smoothing_window: usize,
    ) -> LoadOutcome {
        let raw = generator.generate(self.duration_secs);
        self.finish_synthesis(name, raw, smoothing_window, AssetOrigin::Custom)
    }

    fn load_file(&self, name: &str, path: &Path) -> Result<LoadOutcome, Diagnostic> {
        let decode_failure = |cause: String| Diagnostic::DecodeFailure {
            profile: name.to_string(),
            path: path.to_path_buf(),
            cause,
        };

        let buffer = am_formats::load_wav(path).map_err(|e| decode_failure(e.to_string()))?;
        if buffer.is_empty() {
            return Err(decode_failure("no sample data".to_string()));
        }
        let mut diagnostics = Vec::new();
        if buffer.sample_rate() != self.sample_rate {
            report(
                &mut diagnostics,
                Diagnostic::SampleRateMismatch {
                    profile: name.to_string(),
                    path: path.to_path_buf(),
                    file_rate: buffer.sample_rate(),
                    device_rate: self.sample_rate,
                },
            );
        }

        log::info!(
            "Loaded {} from {} ({} frames, {} ch)",
            name,
            path.display(),
            buffer.frames(),
            buffer.channels()
        );
        Ok(LoadOutcome {
            asset: SoundAsset {
                name: name.to_string(),
                buffer: Arc::new(buffer),
                origin: AssetOrigin::File(path.to_path_buf()),
            },
            diagnostics,
        })
    }

    fn finish_synthesis(
        &self,
        name: &str,
        raw: am_dsp::RawSignal,
        smoothing_window: usize,
        origin: AssetOrigin,
    ) -> LoadOutcome {
        let config = ShapeConfig {
            smoothing_window,
            fade_secs: self.fade_secs,
        };
        let shaped = shape(raw, &config, self.sample_rate);
        let (buffer, mismatch) =
            encode_or_mono(&shaped, self.requested_channels, self.reported_channels);

        let mut diagnostics = Vec::new();
        if let Some(mismatch) = mismatch {
            report(
                &mut diagnostics,
                Diagnostic::ChannelLayoutMismatch {
                    profile: name.to_string(),
                    mismatch,
                },
            );
        }

        log::info!(
            "Synthesized {} ({:?}, window {}, {} frames, {} ch)",
            name,
            origin,
            smoothing_window,
            buffer.frames(),
            buffer.channels()
        );
        LoadOutcome {
            asset: SoundAsset {
                name: name.to_string(),
                buffer: Arc::new(buffer.with_sample_rate(self.sample_rate)),
                origin,
            },
            diagnostics,
        }
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    log::warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}

/// Load or synthesize a single profile for export, assuming the device
/// carries the requested channel count.
pub fn render_profile(profile: &SoundProfile, config: &MixerConfig) -> LoadOutcome {
    AssetLoader::new(config, Some(config.requested_channels)).load_or_synthesize(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use am_dsp::FnGenerator;

    fn config(dir: &Path) -> MixerConfig {
        MixerConfig {
            sounds_dir: dir.to_path_buf(),
            duration_secs: 0.05,
            seed: Some(11),
            ..MixerConfig::default()
        }
    }

    fn wind() -> SoundProfile {
        SoundProfile::new("Wind", "wind.wav", Procedural::new(GeneratorId::PinkNoise, 4))
    }

    #[test]
    fn missing_file_names_profile_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = AssetLoader::new(&config(dir.path()), Some(2)).load_or_synthesize(&wind());

        assert!(outcome.asset.is_synthesized());
        assert_eq!(outcome.diagnostics.len(), 1);
        let message = outcome.diagnostics[0].to_string();
        assert!(message.contains("Wind"));
        assert!(message.contains("wind.wav"));
    }

    #[test]
    fn unreadable_file_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("wind.wav"), b"RIFF but not really").unwrap();
        let outcome = AssetLoader::new(&config(dir.path()), Some(2)).load_or_synthesize(&wind());

        assert!(matches!(
            outcome.diagnostics.as_slice(),
            [Diagnostic::DecodeFailure { profile, .. }] if profile == "Wind"
        ));
        assert_eq!(outcome.asset.origin(), &AssetOrigin::Synthesized(GeneratorId::PinkNoise));
    }

    #[test]
    fn synthesized_length_follows_duration() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = AssetLoader::new(&config(dir.path()), Some(2)).load_or_synthesize(&wind());
        let buffer = outcome.asset.buffer();
        assert_eq!(buffer.frames(), 2205);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.get(0, 0), 0);
        assert_eq!(buffer.get(buffer.frames() - 1, 1), 0);
    }

    #[test]
    fn narrow_device_gets_mono_and_a_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = MixerConfig {
            requested_channels: 4,
            ..config(dir.path())
        };
        let outcome = AssetLoader::new(&cfg, Some(2)).load_or_synthesize(&wind());

        assert!(outcome.asset.buffer().is_mono());
        assert!(matches!(
            outcome.diagnostics.last(),
            Some(Diagnostic::ChannelLayoutMismatch { mismatch, .. })
                if *mismatch == ChannelLayoutMismatch { requested: 4, reported: 2 }
        ));
    }

    #[test]
    fn same_seed_same_asset() {
        let dir = tempfile::tempdir().unwrap();
        let a = AssetLoader::new(&config(dir.path()), None).load_or_synthesize(&wind());
        let b = AssetLoader::new(&config(dir.path()), None).load_or_synthesize(&wind());
        assert_eq!(a.asset.buffer().samples(), b.asset.buffer().samples());
    }

    #[test]
    fn custom_generator_goes_through_shaping() {
        let dir = tempfile::tempdir().unwrap();
        let mut square = FnGenerator(|| vec![0.25, -0.25, 0.25, -0.25]);

        let unfaded = MixerConfig {
            requested_channels: 1,
            fade_secs: 0.0,
            ..config(dir.path())
        };
        let outcome =
            AssetLoader::new(&unfaded, Some(1)).synthesize_with("Square", &mut square, 1);
        assert_eq!(outcome.asset.origin(), &AssetOrigin::Custom);
        assert_eq!(outcome.asset.buffer().samples(), &[32767, -32767, 32767, -32767]);

        let faded =
            AssetLoader::new(&config(dir.path()), Some(2)).synthesize_with("Square", &mut square, 1);
        let samples = faded.asset.buffer().samples();
        assert_eq!(samples.first(), Some(&0));
        assert_eq!(samples.last(), Some(&0));
    }
}
