use crossbeam_channel::Receiver;

use super::frame::MixFrame;
use super::voice::Voice;
use crate::audio_api::MixerCommand;
use crate::shared::CHANNELS;

// both buffers are sized once in new(); the callback never allocates
pub const MAX_VOICES: usize = 64; // triggers past this are dropped
pub const BLOCK_CAPACITY: usize = 4096; // bigger blocks are mixed in pieces

/// Audio-thread end of the mixer.
///
/// Voices requested with [`MixerHandle::trigger`](crate::audio_api::MixerHandle::trigger)
/// wait in the command queue and are only admitted at the top of
/// [`Mixer::render`], so the active set never changes while a block is being mixed.
pub struct Mixer {
    rx: Receiver<MixerCommand>,
    active: Vec<Voice>,
    accum: Vec<MixFrame>,
    scratch: Vec<i16>, // i16 staging for float devices
}

impl Mixer {
    pub fn new(rx: Receiver<MixerCommand>) -> Self {
        Self {
            rx,
            active: Vec::with_capacity(MAX_VOICES),
            accum: vec![MixFrame::zero(); BLOCK_CAPACITY],
            scratch: vec![0; BLOCK_CAPACITY * CHANNELS],
        }
    }

    /// Fill `out` (interleaved stereo i16) completely. Never blocks, and with
    /// nothing playing the block is silence of the full requested length.
    pub fn render(&mut self, out: &mut [i16]) {
        self.admit_queued();

        let whole = out.len() - out.len() % CHANNELS;
        let (frames, tail) = out.split_at_mut(whole);
        for chunk in frames.chunks_mut(BLOCK_CAPACITY * CHANNELS) {
            self.mix_chunk(chunk);
        }
        tail.fill(0);
    }

    /// Same as [`Mixer::render`] for devices that want f32 in [-1, 1).
    pub fn render_f32(&mut self, out: &mut [f32]) {
        let mut scratch = std::mem::take(&mut self.scratch);
        for chunk in out.chunks_mut(scratch.len()) {
            let block = &mut scratch[..chunk.len()];
            self.render(block);
            for (dst, &s) in chunk.iter_mut().zip(block.iter()) {
                *dst = s as f32 / 32768.0;
            }
        }
        self.scratch = scratch;
    }

    fn mix_chunk(&mut self, out: &mut [i16]) {
        let Self { active, accum, .. } = self;
        let accum = &mut accum[..out.len() / CHANNELS];
        accum.fill(MixFrame::zero());

        active.retain_mut(|voice| {
            voice.mix_into(accum);
            !voice.is_finished()
        });

        for (dst, acc) in out.chunks_exact_mut(CHANNELS).zip(accum.iter()) {
            dst.copy_from_slice(&acc.clamped());
        }
    }

    fn admit_queued(&mut self) {
        while let Ok(cmd) = self.rx.try_recv() {
            match cmd {
                MixerCommand::Play { id, buffer } => {
                    let active_len = self.active.len();
                    match self.active.iter_mut().find(|v| v.id() == &id) {
                        Some(voice) => voice.rewind(),
                        None if active_len < MAX_VOICES => {
                            self.active.push(Voice::new(id, buffer))
                        }
                        None => {}
                    }
                }
            }
        }
    }

    pub fn active_voices(&self) -> usize {
        self.active.len()
    }

    pub fn voice_position(&self, id: &super::SampleId) -> Option<usize> {
        self.active.iter().find(|v| v.id() == id).map(|v| v.pos())
    }
}
