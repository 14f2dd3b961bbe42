//! Main mixing engine.

use std::fmt;
use std::sync::Arc;

use am_dsp::EncodedBuffer;
use heapless::Vec as FixedVec;

use crate::channel::ChannelControl;
use crate::voice::Voice;

/// Number of looping channels the engine can hold.
pub const MAX_CHANNELS: usize = 8;

/// Widest device frame the engine renders.
pub const MAX_OUTPUT_CHANNELS: usize = 8;

/// Returned when every voice slot is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineFull;

impl fmt::Display for EngineFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine already holds {} channels", MAX_CHANNELS)
    }
}

impl std::error::Error for EngineFull {}

/// The mixing engine.
pub struct Engine {
    /// Voice slots, one per channel.
    voices: FixedVec<Voice, MAX_CHANNELS>,
    /// Samples per device frame.
    output_channels: u16,
}

impl Engine {
    /// Create an engine rendering `output_channels`-wide frames (clamped to
    /// 1..=[`MAX_OUTPUT_CHANNELS`]).
    pub fn new(output_channels: u16) -> Self {
        Self {
            voices: FixedVec::new(),
            output_channels: output_channels.clamp(1, MAX_OUTPUT_CHANNELS as u16),
        }
    }

    pub fn output_channels(&self) -> u16 {
        self.output_channels
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Bind a buffer to a channel. Returns the voice slot.
    pub fn add_voice(
        &mut self,
        buffer: Arc<EncodedBuffer>,
        control: Arc<ChannelControl>,
    ) -> Result<usize, EngineFull> {
        self.voices
            .push(Voice::new(buffer, control))
            .map_err(|_| EngineFull)?;
        Ok(self.voices.len() - 1)
    }

    /// Mix one device frame into `out`.
    ///
    /// Only the first `output_channels` samples of `out` are written; any
    /// extra slots are zeroed.
    pub fn next_frame(&mut self, out: &mut [i16]) {
        let width = (self.output_channels as usize).min(out.len());
        let mut acc = [0.0f32; MAX_OUTPUT_CHANNELS];
        for voice in self.voices.iter_mut() {
            voice.mix_into(&mut acc[..width]);
        }
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = if i < width { clip(acc[i]) } else { 0 };
        }
    }

    /// Render `frames` interleaved device frames (offline use).
    pub fn render_frames(&mut self, frames: usize) -> Vec<i16> {
        let width = self.output_channels as usize;
        let mut out = vec![0i16; frames * width];
        for frame in out.chunks_exact_mut(width) {
            self.next_frame(frame);
        }
        out
    }
}

#[inline]
fn clip(v: f32) -> i16 {
    v.round().clamp(-32768.0, 32767.0) as i16
}
