//! Smoothing, peak normalization, and loop-edge fades.

use crate::signal::{RawSignal, ShapedSignal, DEFAULT_FADE_SECS};

/// How a raw buffer is shaped before encoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeConfig {
    /// Moving-average window in samples; 0 and 1 disable smoothing.
    pub smoothing_window: usize,
    /// Fade-in/fade-out length at each loop edge.
    pub fade_secs: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 1,
            fade_secs: DEFAULT_FADE_SECS,
        }
    }
}

impl ShapeConfig {
    pub fn smoothed(window: usize) -> Self {
        Self {
            smoothing_window: window,
            ..Self::default()
        }
    }
}

/// Smooth, normalize, then fade.
pub fn shape(raw: RawSignal, config: &ShapeConfig, sample_rate: u32) -> ShapedSignal {
    let smoothed = moving_average(raw.into_samples(), config.smoothing_window);
    let normalized = normalize(smoothed);
    ShapedSignal::from_shaped(apply_fade_edges(normalized, config.fade_secs, sample_rate))
}

/// Centered uniform convolution with output length equal to input length.
///
/// Samples outside the signal count as zero, so the edges are attenuated the
/// same way a zero-padded "same" convolution attenuates them.
pub fn moving_average(signal: Vec<f32>, window: usize) -> Vec<f32> {
    if window <= 1 || signal.is_empty() {
        return signal;
    }
    let n = signal.len();
    // prefix[i] = sum of signal[..i]
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0f64);
    let mut acc = 0.0f64;
    for &s in &signal {
        acc += s as f64;
        prefix.push(acc);
    }

    let offset = (window - 1) / 2;
    let scale = 1.0 / window as f64;
    (0..n)
        .map(|i| {
            // Window covers signal[i + offset + 1 - window ..= i + offset].
            let hi = (i + offset + 1).min(n);
            let lo = (i + offset + 1).saturating_sub(window);
            ((prefix[hi] - prefix[lo]) * scale) as f32
        })
        .collect()
}

/// Divide by the peak absolute value. Silence is returned untouched.
pub fn normalize(mut signal: Vec<f32>) -> Vec<f32> {
    let peak = signal.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak == 0.0 || !peak.is_finite() {
        return signal;
    }
    for s in signal.iter_mut() {
        *s /= peak;
    }
    signal
}

/// Linear fade-in over the head and fade-out over the tail.
///
/// The ramp includes both endpoints, so the first and last samples become
/// exactly zero whenever at least one sample is faded.
pub fn apply_fade_edges(mut signal: Vec<f32>, fade_secs: f32, sample_rate: u32) -> Vec<f32> {
    let fade_len = sample_count_floor(sample_rate, fade_secs).min(signal.len() / 2);
    if fade_len == 0 {
        return signal;
    }
    let n = signal.len();
    for i in 0..fade_len {
        let g = ramp(i, fade_len);
        signal[i] *= g;
        signal[n - 1 - i] *= g;
    }
    signal
}

fn sample_count_floor(sample_rate: u32, secs: f32) -> usize {
    let n = (secs * sample_rate as f32).floor();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

// Evenly spaced 0.0..=1.0 over `len` points.
fn ramp(i: usize, len: usize) -> f32 {
    if len == 1 {
        0.0
    } else {
        i as f32 / (len - 1) as f32
    }
}
