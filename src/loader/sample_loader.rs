use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::audio::{PcmBuffer, SampleId};
use crate::error::SampleError;

/// Turns a sample name into playable PCM.
pub trait SampleSource: Send + Sync {
    fn open(&self, id: &SampleId) -> Result<Arc<PcmBuffer>, SampleError>;
}

// WAV files under a root directory. Decoded files are cached, so the second
// and later triggers of a sample never touch the disk.
pub struct WavLibrary {
    root: PathBuf,
    cache: Mutex<HashMap<SampleId, Arc<PcmBuffer>>>,
}

impl WavLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &SampleId) -> PathBuf {
        self.root.join(id.as_str())
    }

    // Decode everything up front so the first trigger is as cheap as the rest.
    // Failures are only logged, a missing sample just won't play.
    pub fn preload<'a>(&self, ids: impl IntoIterator<Item = &'a SampleId>) -> usize {
        let mut loaded = 0;
        for id in ids {
            match self.open(id) {
                Ok(_) => loaded += 1,
                Err(e) => log::warn!("preload skipped: {e}"),
            }
        }
        loaded
    }

    pub fn cached(&self) -> usize {
        self.cache.lock().len()
    }
}

impl SampleSource for WavLibrary {
    fn open(&self, id: &SampleId) -> Result<Arc<PcmBuffer>, SampleError> {
        if let Some(buf) = self.cache.lock().get(id) {
            return Ok(Arc::clone(buf));
        }

        // decode without holding the lock
        let path = self.path_for(id);
        let buf = Arc::new(PcmBuffer::load_wav(&path)?);
        log::debug!("decoded {} ({} frames)", path.display(), buf.frames());

        let mut cache = self.cache.lock();
        Ok(Arc::clone(cache.entry(id.clone()).or_insert(buf)))
    }
}

/// Samples that already live in memory.
#[derive(Default)]
pub struct MemorySource {
    samples: HashMap<SampleId, Arc<PcmBuffer>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<SampleId>, buffer: PcmBuffer) {
        self.samples.insert(id.into(), Arc::new(buffer));
    }

    pub fn with(mut self, id: impl Into<SampleId>, buffer: PcmBuffer) -> Self {
        self.insert(id, buffer);
        self
    }
}

impl SampleSource for MemorySource {
    fn open(&self, id: &SampleId) -> Result<Arc<PcmBuffer>, SampleError> {
        self.samples
            .get(id)
            .cloned()
            .ok_or_else(|| SampleError::NotFound {
                path: PathBuf::from(id.as_str()),
            })
    }
}
