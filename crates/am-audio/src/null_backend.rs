//! Headless output: holds the engine and renders on demand.

use am_engine::Engine;

use crate::traits::{AudioError, AudioOutput};

/// Output with no device behind it.
///
/// Frames are pulled by calling [`NullOutput::render`]. Used for offline
/// rendering and for driving the mixer in tests.
pub struct NullOutput {
    sample_rate: u32,
    channels: Option<u16>,
    fail_start: bool,
    engine: Option<Engine>,
}

impl NullOutput {
    /// A device that reports `channels` (or nothing, when `None`).
    pub fn new(sample_rate: u32, channels: Option<u16>) -> Self {
        Self {
            sample_rate,
            channels,
            fail_start: false,
            engine: None,
        }
    }

    /// A device whose stream can never be started.
    pub fn failing(sample_rate: u32, channels: Option<u16>) -> Self {
        Self {
            fail_start: true,
            ..Self::new(sample_rate, channels)
        }
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_some()
    }

    /// Width of frames produced by [`NullOutput::render`].
    pub fn frame_width(&self) -> usize {
        match &self.engine {
            Some(engine) => engine.output_channels() as usize,
            None => self.channels.unwrap_or(2).max(1) as usize,
        }
    }

    /// Pull `frames` interleaved frames. Silence while stopped.
    pub fn render(&mut self, frames: usize) -> Vec<i16> {
        match self.engine.as_mut() {
            Some(engine) => engine.render_frames(frames),
            None => vec![0; frames * self.frame_width()],
        }
    }
}

impl AudioOutput for NullOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> Option<u16> {
        self.channels
    }

    fn start(&mut self, engine: Engine) -> Result<(), AudioError> {
        if self.fail_start {
            return Err(AudioError::StreamCreate("null output refused to start".into()));
        }
        self.engine = Some(engine);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.engine = None;
        Ok(())
    }
}
