//! Per-channel control shared between the control thread and the mixer.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

const IDLE: u8 = 0;
const LOOPING: u8 = 1;
const FINISHED: u8 = 2;

/// Observable playback state of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Looping,
}

/// Gain and playback state of one mixer channel.
///
/// Both fields are single-word atomics: a write from the control thread is
/// picked up by the next frame the mixer renders, with no ordering guarantee
/// across channels.
#[derive(Debug)]
pub struct ChannelControl {
    /// Gain in [0, 1], stored as `f32` bits.
    gain: AtomicU32,
    state: AtomicU8,
}

impl ChannelControl {
    pub fn new(gain: f32) -> Self {
        Self {
            gain: AtomicU32::new(clamp_gain(gain).to_bits()),
            state: AtomicU8::new(IDLE),
        }
    }

    #[inline]
    pub fn gain(&self) -> f32 {
        f32::from_bits(self.gain.load(Ordering::Relaxed))
    }

    /// Store `gain` clamped to [0, 1] and return the stored value.
    pub fn set_gain(&self, gain: f32) -> f32 {
        let gain = clamp_gain(gain);
        self.gain.store(gain.to_bits(), Ordering::Relaxed);
        gain
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        match self.state.load(Ordering::Acquire) {
            LOOPING => PlaybackState::Looping,
            _ => PlaybackState::Stopped,
        }
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.state.load(Ordering::Acquire) == LOOPING
    }

    /// Enter `Looping`. Only succeeds once per channel.
    pub fn start_loop(&self) -> bool {
        self.state
            .compare_exchange(IDLE, LOOPING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Stop for good. Returns true if the channel was looping.
    pub fn stop(&self) -> bool {
        self.state.swap(FINISHED, Ordering::AcqRel) == LOOPING
    }
}

fn clamp_gain(gain: f32) -> f32 {
    if gain.is_nan() {
        0.0
    } else {
        gain.clamp(0.0, 1.0)
    }
}
