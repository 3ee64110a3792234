// to be called on startup; reads settings and the optional preset
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::pipeline::project::{Preset, Settings};
use crate::shared::{BANK_SIZE, MAX_BANKS};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let settings: Settings = read_json(path)?;
    if !settings.bpm.is_finite() || settings.bpm <= 0.0 {
        return Err(ConfigError::InvalidBpm(settings.bpm));
    }
    Ok(settings)
}

pub fn load_preset(path: &Path) -> Result<Preset, ConfigError> {
    let preset: Preset = read_json(path)?;
    validate_preset(&preset)?;
    Ok(preset)
}

pub fn validate_preset(preset: &Preset) -> Result<(), ConfigError> {
    if preset.tap_banks.len() > MAX_BANKS {
        return Err(ConfigError::TooManyBanks(preset.tap_banks.len()));
    }
    if let Some((i, bank)) = preset.tap_banks.iter().enumerate().find(|(_, b)| b.len() > BANK_SIZE) {
        return Err(ConfigError::BankTooLarge { bank: i + 1, len: bank.len() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::FillId;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn settings_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "config.json", r#"{ "bpm": 145, "device": "USB" }"#);
        let s = load_settings(&path).unwrap();
        assert_eq!(s.bpm, 145.0);
        assert_eq!(s.device, "USB");
        assert_eq!(s.sample_dir, Path::new("."));
        // logs never go to the terminal the ui is drawn on
        assert_eq!(s.log_file, Path::new("stepbox.log"));
    }

    #[test]
    fn log_file_can_be_moved() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "config.json",
            r#"{ "bpm": 90, "device": "", "log_file": "/tmp/drums.log" }"#,
        );
        assert_eq!(load_settings(&path).unwrap().log_file, Path::new("/tmp/drums.log"));
    }

    #[test]
    fn zero_bpm_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "config.json", r#"{ "bpm": 0, "device": "" }"#);
        assert!(matches!(load_settings(&path), Err(ConfigError::InvalidBpm(_))));
    }

    #[test]
    fn missing_and_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_settings(&dir.path().join("nope.json")),
            Err(ConfigError::Io { .. })
        ));
        let path = write(dir.path(), "bad.json", "{ bpm: ");
        assert!(matches!(load_preset(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn preset_builds_sequencer() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "preset.json",
            r#"{
                "pattern": ["kick.wav", null, null, null, "snare.wav"],
                "fill1": ["hat.wav", 0],
                "tap_banks": [["kick.wav", "snare.wav"], ["clap.wav"]]
            }"#,
        );
        let seq = load_preset(&path).unwrap().to_sequencer();

        assert_eq!(seq.pattern().get(0).sample().map(|s| s.as_str()), Some("kick.wav"));
        assert!(seq.pattern().get(1).is_empty());
        assert_eq!(seq.pattern().get(4).sample().map(|s| s.as_str()), Some("snare.wav"));

        let fill1 = seq.fill(FillId::Fill1);
        assert_eq!(fill1.interval, 16);
        assert!(!fill1.enabled);
        assert!(seq.fill(FillId::Fill2).sample.is_empty());
        assert_eq!(seq.banks().len(), 2);
    }

    #[test]
    fn oversized_bank_is_rejected() {
        let preset = Preset {
            tap_banks: vec![vec![], vec!["x".to_string(); 9]],
            ..Default::default()
        };
        assert!(matches!(
            validate_preset(&preset),
            Err(ConfigError::BankTooLarge { bank: 2, len: 9 })
        ));
    }

    #[test]
    fn too_many_banks() {
        let preset = Preset {
            tap_banks: vec![vec![]; MAX_BANKS + 1],
            ..Default::default()
        };
        assert!(matches!(validate_preset(&preset), Err(ConfigError::TooManyBanks(1000))));
    }
}
