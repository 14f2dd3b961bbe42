//! Fixed-point encoding of shaped signals.

use std::fmt;

use crate::signal::{ShapedSignal, SAMPLE_RATE};

/// Channel count assumed when the device does not report one.
pub const DEFAULT_DEVICE_CHANNELS: u16 = 2;

/// Interleaved 16-bit PCM ready for playback.
///
/// Always has at least one channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedBuffer {
    samples: Vec<i16>,
    channels: u16,
    sample_rate: u32,
}

impl Default for EncodedBuffer {
    /// Empty mono buffer at [`SAMPLE_RATE`].
    fn default() -> Self {
        Self::new(Vec::new(), 1, SAMPLE_RATE)
    }
}

impl EncodedBuffer {
    /// Wrap interleaved samples. A channel count of 0 is treated as mono,
    /// and a trailing partial frame is dropped.
    pub fn new(mut samples: Vec<i16>, channels: u16, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let whole = samples.len() - samples.len() % channels as usize;
        samples.truncate(whole);
        Self {
            samples,
            channels,
            sample_rate,
        }
    }

    /// Relabel the playback rate (encoding assumes [`SAMPLE_RATE`]).
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_mono(&self) -> bool {
        self.channels == 1
    }

    /// Sample at `frame` for channel `ch`; channels past the last one read the
    /// last channel.
    #[inline]
    pub fn get(&self, frame: usize, ch: u16) -> i16 {
        let ch = ch.min(self.channels - 1) as usize;
        self.samples
            .get(frame * self.channels as usize + ch)
            .copied()
            .unwrap_or(0)
    }

    /// De-interleaved stream of one channel.
    pub fn channel(&self, ch: u16) -> impl Iterator<Item = i16> + '_ {
        let ch = ch.min(self.channels - 1) as usize;
        self.samples
            .iter()
            .skip(ch)
            .step_by(self.channels as usize)
            .copied()
    }
}

/// `clamp(round(sample * 32767), -32768, 32767)`.
#[inline]
pub fn to_fixed(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample * 32767.0).round().clamp(-32768.0, 32767.0) as i16
}

/// Encode a shaped signal, replicating it across `channels` interleaved
/// channels. `channels <= 1` encodes mono.
pub fn encode(signal: &ShapedSignal, channels: u16) -> EncodedBuffer {
    let channels = channels.max(1);
    let mut samples = Vec::with_capacity(signal.len() * channels as usize);
    for &s in signal.samples() {
        let v = to_fixed(s);
        for _ in 0..channels {
            samples.push(v);
        }
    }
    EncodedBuffer {
        samples,
        channels,
        sample_rate: SAMPLE_RATE,
    }
}

/// The device cannot carry the requested layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelLayoutMismatch {
    pub requested: u16,
    pub reported: u16,
}

impl fmt::Display for ChannelLayoutMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested {} channels but device reports {}",
            self.requested, self.reported
        )
    }
}

impl std::error::Error for ChannelLayoutMismatch {}

/// Encode for the device's channel layout (`None` means the device gave no
/// channel info). A device narrower than `requested` is a mismatch; a wider
/// one gets its own channel count.
pub fn encode_for_device(
    signal: &ShapedSignal,
    requested: u16,
    reported: Option<u16>,
) -> Result<EncodedBuffer, ChannelLayoutMismatch> {
    let reported = reported.unwrap_or(DEFAULT_DEVICE_CHANNELS);
    if requested > 1 && reported < requested {
        return Err(ChannelLayoutMismatch {
            requested,
            reported,
        });
    }
    Ok(encode(signal, requested.max(reported)))
}

/// Like [`encode_for_device`], but falls back to a mono encoding of the same
/// shaped signal on a layout mismatch and hands the mismatch back.
pub fn encode_or_mono(
    signal: &ShapedSignal,
    requested: u16,
    reported: Option<u16>,
) -> (EncodedBuffer, Option<ChannelLayoutMismatch>) {
    match encode_for_device(signal, requested, reported) {
        Ok(buf) => (buf, None),
        Err(mismatch) => {
            log::warn!("{}; falling back to mono encoding", mismatch);
            (encode(signal, 1), Some(mismatch))
        }
    }
}
