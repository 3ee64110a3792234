use std::sync::Arc;

use super::frame::MixFrame;
use super::sample_buffer::PcmBuffer;
use super::sample_id::SampleId;
use crate::shared::CHANNELS;

// One sample being played: shared PCM plus a read position in frames.
#[derive(Clone, Debug)]
pub struct Voice {
    id: SampleId,
    buffer: Arc<PcmBuffer>,
    pos: usize,
}

impl Voice {
    pub fn new(id: SampleId, buffer: Arc<PcmBuffer>) -> Self {
        Self { id, buffer, pos: 0 }
    }

    pub fn id(&self) -> &SampleId {
        &self.id
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    pub fn is_finished(&self) -> bool {
        self.pos >= self.buffer.frames()
    }

    // Add up to out.len() frames into the accumulator, returns how many were read.
    // Zero means this voice has nothing left to give.
    pub fn mix_into(&mut self, out: &mut [MixFrame]) -> usize {
        let remaining = self.buffer.frames().saturating_sub(self.pos);
        let n = remaining.min(out.len());
        if n == 0 {
            return 0;
        }

        let start = self.pos * CHANNELS;
        let src = &self.buffer.data[start..start + n * CHANNELS];
        for (acc, frame) in out.iter_mut().zip(src.chunks_exact(CHANNELS)) {
            acc.add(frame[0], frame[1]);
        }

        self.pos += n;
        n
    }
}
