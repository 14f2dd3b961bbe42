//! Playback engine for ambimix.
//!
//! Mixes a fixed set of looping channels into device frames. The engine is
//! moved into the audio device's callback; the control thread talks to it only
//! through each channel's [`ChannelControl`].

mod channel;
mod mixer;
mod voice;

pub use channel::{ChannelControl, PlaybackState};
pub use mixer::{Engine, EngineFull, MAX_CHANNELS, MAX_OUTPUT_CHANNELS};
pub use voice::Voice;
