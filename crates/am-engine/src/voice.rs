//! Voice: one looping buffer bound to one channel.

use std::sync::Arc;

use am_dsp::EncodedBuffer;

use crate::channel::ChannelControl;

/// Looping playback cursor over a shared buffer.
#[derive(Clone, Debug)]
pub struct Voice {
    buffer: Arc<EncodedBuffer>,
    control: Arc<ChannelControl>,
    /// Current frame in the buffer.
    position: usize,
}

impl Voice {
    pub fn new(buffer: Arc<EncodedBuffer>, control: Arc<ChannelControl>) -> Self {
        Self {
            buffer,
            control,
            position: 0,
        }
    }

    pub fn control(&self) -> &Arc<ChannelControl> {
        &self.control
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Add one frame at the channel's gain into `acc` (one slot per device
    /// channel) and advance, wrapping at the end of the buffer.
    #[inline]
    pub fn mix_into(&mut self, acc: &mut [f32]) {
        if !self.control.is_looping() {
            return;
        }
        let frames = self.buffer.frames();
        if frames == 0 {
            return;
        }
        let gain = self.control.gain();
        for (ch, slot) in acc.iter_mut().enumerate() {
            *slot += self.buffer.get(self.position, ch as u16) as f32 * gain;
        }
        self.position += 1;
        if self.position >= frames {
            self.position = 0;
        }
    }
}
