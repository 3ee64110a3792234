use std::io::ErrorKind;
use std::path::Path;

use crate::error::SampleError;
use crate::shared::{BITS_PER_SAMPLE, CHANNELS, SAMPLE_RATE};

// Decoded PCM, interleaved 16-bit stereo at the engine rate
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PcmBuffer {
    pub data: Vec<i16>,
}

impl PcmBuffer {
    pub fn from_interleaved(data: Vec<i16>) -> Self {
        Self { data }
    }

    pub fn frames(&self) -> usize {
        self.data.len() / CHANNELS
    }

    // Load a WAV from disk. Only 16-bit integer stereo at 44.1kHz is accepted;
    // anything else is refused rather than converted.
    pub fn load_wav(path: &Path) -> Result<Self, SampleError> {
        let mut reader = hound::WavReader::open(path).map_err(|e| match e {
            hound::Error::IoError(io) if io.kind() == ErrorKind::NotFound => SampleError::NotFound {
                path: path.to_path_buf(),
            },
            source => SampleError::Decode {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let spec = reader.spec();
        let unsupported = |reason: String| SampleError::Unsupported {
            path: path.to_path_buf(),
            reason,
        };
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != BITS_PER_SAMPLE {
            return Err(unsupported(format!(
                "{:?} {}-bit, expected 16-bit integer PCM",
                spec.sample_format, spec.bits_per_sample
            )));
        }
        if spec.channels as usize != CHANNELS {
            return Err(unsupported(format!("{} channels, expected {}", spec.channels, CHANNELS)));
        }
        if spec.sample_rate != SAMPLE_RATE {
            return Err(unsupported(format!("{} Hz, expected {}", spec.sample_rate, SAMPLE_RATE)));
        }

        let data = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SampleError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self { data })
    }
}
