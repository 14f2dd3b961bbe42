//! Signal pipeline for ambimix.
//!
//! Procedural sources are built in three stages: a [`Generator`] produces a
//! raw noise buffer, the shaper smooths, normalizes and fades it, and the
//! encoder converts the result into interleaved 16-bit PCM for the device.

mod encoder;
mod generator;
mod shaper;
mod signal;

pub use encoder::{
    encode, encode_for_device, encode_or_mono, to_fixed, ChannelLayoutMismatch, EncodedBuffer,
    DEFAULT_DEVICE_CHANNELS,
};
pub use generator::{generate, FnGenerator, Generator, GeneratorId, NoiseGenerator};
pub use shaper::{apply_fade_edges, moving_average, normalize, shape, ShapeConfig};
pub use signal::{
    sample_count, RawSignal, ShapedSignal, DEFAULT_DURATION_SECS, DEFAULT_FADE_SECS, SAMPLE_RATE,
};
