//! Sound profiles and where their audio comes from.

use std::path::{Path, PathBuf};

use am_dsp::GeneratorId;

/// How to synthesize a profile when its file is unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Procedural {
    pub generator: GeneratorId,
    /// Moving-average window applied before normalization; 1 disables it.
    pub smoothing_window: usize,
}

impl Procedural {
    pub const fn new(generator: GeneratorId, smoothing_window: usize) -> Self {
        Self {
            generator,
            smoothing_window,
        }
    }
}

/// A named ambient sound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoundProfile {
    /// Display name, also the channel's identity.
    pub name: String,
    /// File looked up in the sounds directory.
    pub file_name: String,
    pub procedural: Procedural,
}

impl SoundProfile {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>, procedural: Procedural) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            procedural,
        }
    }

    pub fn path_in(&self, sounds_dir: &Path) -> PathBuf {
        sounds_dir.join(&self.file_name)
    }

    pub fn file_source(&self, sounds_dir: &Path) -> AssetSource {
        AssetSource::FileBacked(self.path_in(sounds_dir))
    }

    pub fn procedural_source(&self) -> AssetSource {
        AssetSource::Procedural(self.procedural)
    }
}

/// Where a profile's buffer is produced from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    FileBacked(PathBuf),
    Procedural(Procedural),
}

/// The eight stock profiles.
pub fn default_profiles() -> Vec<SoundProfile> {
    use GeneratorId::*;

    [
        ("Birds", "birds.wav", Procedural::new(WhiteNoise, 2)),
        ("Crickets", "cricket.wav", Procedural::new(WhiteNoise, 1)),
        ("Fire", "fire.wav", Procedural::new(WhiteNoise, 3)),
        ("Rainfall", "rain.wav", Procedural::new(WhiteNoise, 6)),
        ("Singing Bowl", "singingbowl.wav", Procedural::new(PinkNoise, 32)),
        ("Ocean Waves", "waves.wav", Procedural::new(BrownNoise, 128)),
        ("Wind", "wind.wav", Procedural::new(PinkNoise, 64)),
        ("Coffee Shop", "coffeeshop.wav", Procedural::new(PinkNoise, 8)),
    ]
    .into_iter()
    .map(|(name, file, procedural)| SoundProfile::new(name, file, procedural))
    .collect()
}
