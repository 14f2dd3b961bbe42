//! Audio output trait and error types.

use am_engine::Engine;

/// Error type for audio operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Playback error
    Playback(String),
    /// Device only offers sample formats the mixer cannot write
    UnsupportedFormat(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::DeviceInit(msg) => write!(f, "Device init error: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "Stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AudioError::UnsupportedFormat(msg) => write!(f, "Unsupported sample format: {}", msg),
            AudioError::NoDevice => write!(f, "No audio device available"),
        }
    }
}

impl std::error::Error for AudioError {}

/// What the mixer asks the device for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputRequest {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for OutputRequest {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
        }
    }
}

/// Trait for audio output backends.
///
/// The backend owns the device context. Once started it pulls frames from the
/// engine on its own thread; the caller keeps only the channel controls.
pub trait AudioOutput {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    /// Channel count the device actually opened with, if it reports one.
    fn channels(&self) -> Option<u16>;

    /// Hand the engine to the device and start pulling frames.
    fn start(&mut self, engine: Engine) -> Result<(), AudioError>;

    /// Stop playback and release the stream. Calling it again is a no-op.
    fn stop(&mut self) -> Result<(), AudioError>;
}
