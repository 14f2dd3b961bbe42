//! Floating-point signal types.

/// Playback sample rate for every generated buffer (Hz).
pub const SAMPLE_RATE: u32 = 44_100;

/// Length of a procedural loop in seconds.
pub const DEFAULT_DURATION_SECS: f32 = 8.0;

/// Length of the loop-boundary fade in seconds.
pub const DEFAULT_FADE_SECS: f32 = 0.1;

/// Number of samples in a buffer of `duration_secs` at `sample_rate`.
///
/// Negative or non-finite durations yield an empty buffer.
pub fn sample_count(sample_rate: u32, duration_secs: f32) -> usize {
    let n = (sample_rate as f64 * duration_secs as f64).round();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Mono noise straight out of a generator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSignal {
    samples: Vec<f32>,
}

impl RawSignal {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

impl From<Vec<f32>> for RawSignal {
    fn from(samples: Vec<f32>) -> Self {
        Self::new(samples)
    }
}

/// A signal that went through the shaper.
///
/// Peak amplitude is at most 1.0 unless the source was silent, in which case
/// the samples are all zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapedSignal {
    samples: Vec<f32>,
}

impl ShapedSignal {
    pub(crate) fn from_shaped(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// Wrap samples that are already in range, clamping anything outside [-1, 1].
    pub fn from_normalized(mut samples: Vec<f32>) -> Self {
        for s in samples.iter_mut() {
            *s = if s.is_nan() { 0.0 } else { s.clamp(-1.0, 1.0) };
        }
        Self { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }
}
