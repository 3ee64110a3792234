use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};

pub use crate::audio::{PcmBuffer, SampleId};
use crate::error::SampleError;
use crate::loader::SampleSource;

const COMMAND_QUEUE: usize = 1024;

#[derive(Clone, Debug)]
pub enum MixerCommand {
    // The audio thread can't open files, so the buffer is resolved on the
    // sending side and travels fully built; the mixer only ever sees whole voices.
    Play { id: SampleId, buffer: Arc<PcmBuffer> },
}

/// Control-side end of the mixer. Cheap to clone, usable from any thread.
#[derive(Clone)]
pub struct MixerHandle {
    tx: Sender<MixerCommand>,
    source: Arc<dyn SampleSource>,
}

impl MixerHandle {
    pub fn new(tx: Sender<MixerCommand>, source: Arc<dyn SampleSource>) -> Self {
        Self { tx, source }
    }

    /// Queue `id` for playback. It is admitted at the start of the next audio
    /// block; if it is already sounding it restarts from frame 0 instead.
    pub fn trigger(&self, id: &SampleId) -> Result<(), SampleError> {
        let buffer = self.source.open(id)?;
        match self.tx.try_send(MixerCommand::Play { id: id.clone(), buffer }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::warn!("mixer queue full, dropped trigger for {id}"),
            Err(TrySendError::Disconnected(_)) => log::warn!("mixer is gone, dropped trigger for {id}"),
        }
        Ok(())
    }
}

pub fn command_queue() -> (Sender<MixerCommand>, Receiver<MixerCommand>) {
    crossbeam_channel::bounded(COMMAND_QUEUE)
}
