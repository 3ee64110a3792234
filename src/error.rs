use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sample not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("could not decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    // only one PCM layout is played, nothing is converted
    #[error("unsupported sample {}: {reason}", path.display())]
    Unsupported { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("bpm must be a positive number, got {0}")]
    InvalidBpm(f64),

    #[error("too many sample banks ({0}); at most 999 banks of up to 8 samples are allowed")]
    TooManyBanks(usize),

    #[error("tap bank {bank} has {len} samples; a bank holds at most 8")]
    BankTooLarge { bank: usize, len: usize },
}
