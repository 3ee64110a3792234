// Plain structs for the two JSON files read at startup. Nothing here is ever
// written back; edits made while playing live only as long as the process.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::audio::SampleId;
use crate::sequencer::{Fill, Pattern, Sequencer, Slot, TapBanks};

// config.json
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub bpm: f64,
    // substring of the MIDI output port to send clock to
    pub device: String,
    #[serde(default = "default_sample_dir")]
    pub sample_dir: PathBuf,
    // raw mode owns the terminal, so logs always go to a file
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_sample_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("stepbox.log")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            device: String::new(),
            sample_dir: default_sample_dir(),
            log_file: default_log_file(),
        }
    }
}

// optional preset: initial pattern, fills and tap banks
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub pattern: Vec<Option<String>>,
    #[serde(default)]
    pub fill1: Option<(String, u32)>, // (sample, every n steps)
    #[serde(default)]
    pub fill2: Option<(String, u32)>,
    #[serde(default)]
    pub tap_banks: Vec<Vec<String>>,
}

impl Preset {
    pub fn to_sequencer(&self) -> Sequencer {
        let pattern = Pattern::from_slots(
            self.pattern
                .iter()
                .map(|s| Slot::from(s.as_deref().map(SampleId::new))),
        );
        let fill = |f: &Option<(String, u32)>| {
            f.as_ref()
                .map(|(name, every)| Fill::new(SampleId::new(name), *every))
                .unwrap_or_default()
        };
        let banks = TapBanks::new(
            self.tap_banks
                .iter()
                .map(|bank| bank.iter().map(SampleId::new).collect())
                .collect(),
        );
        Sequencer::new(pattern, [fill(&self.fill1), fill(&self.fill2)], banks)
    }
}
