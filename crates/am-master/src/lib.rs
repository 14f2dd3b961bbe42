//! Headless controller for ambimix.
//!
//! Loads or synthesizes one looping asset per sound profile, hands them to
//! the output device and maps volume events onto per-channel gains. Both the
//! console front end and the tests drive the mixer through this crate.

mod asset;
mod config;
mod mixer;
mod profile;

pub use asset::{render_profile, AssetLoader, AssetOrigin, Diagnostic, LoadOutcome, SoundAsset};
pub use config::MixerConfig;
pub use mixer::{AmbientMixer, AssetKey, MixerChannel, MixerError, VolumeChanged};
pub use profile::{default_profiles, AssetSource, Procedural, SoundProfile};

// Re-export common types so callers don't need the lower crates directly.
pub use am_audio::{AudioError, AudioOutput, CpalOutput, NullOutput};
pub use am_dsp::{EncodedBuffer, GeneratorId};
pub use am_engine::PlaybackState;
pub use am_formats::{write_wav, FormatError};
