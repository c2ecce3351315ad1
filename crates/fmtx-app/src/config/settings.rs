//! Settings parser for .fmtx/config.toml

use super::types::Settings;
use fmtx_core::prelude::*;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.toml";
const FMTX_DIR: &str = ".fmtx";

/// Load settings from `<dir>/.fmtx/config.toml`
///
/// A missing or unreadable file is not an error: defaults are used and the
/// problem is logged.
pub fn load_settings(dir: &Path) -> Settings {
    match read_settings(dir) {
        Ok(settings) => settings,
        Err(Error::ConfigNotFound { path }) => {
            debug!("No config file at {:?}, using defaults", path);
            Settings::default()
        }
        Err(e) => {
            warn!("{}, using defaults", e);
            Settings::default()
        }
    }
}

/// Read and parse `<dir>/.fmtx/config.toml`
pub fn read_settings(dir: &Path) -> Result<Settings> {
    let config_path = dir.join(FMTX_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Err(Error::ConfigNotFound { path: config_path });
    }

    let content = std::fs::read_to_string(&config_path)?;
    let settings = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {:?}: {}", config_path, e)))?;
    debug!("Loaded settings from {:?}", config_path);
    Ok(settings)
}

/// Create `.fmtx/config.toml` with commented defaults if it does not exist
pub fn init_config_dir(dir: &Path) -> Result<()> {
    let fmtx_dir = dir.join(FMTX_DIR);

    if !fmtx_dir.exists() {
        std::fs::create_dir_all(&fmtx_dir)
            .map_err(|e| Error::config(format!("Failed to create .fmtx dir: {}", e)))?;
    }

    let config_path = fmtx_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# FM Transmitter Configuration

[radio]
# us_europe | japan | japan_wide | user
band = "us_europe"
# 200khz | 100khz | 50khz
channel_spacing = "100khz"
# 50us | 75us
emphasis = "75us"
# rbds | rds | none
rds_standard = "rbds"
lower_limit = 87500
upper_limit = 108000

[transmitter]
power_level = 7
settle_ms = 100
ps_text = "QFMRADIO"
ps_repeat_count = 1

[transmitter.program]
program_type = 0
program_id = 4660
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

/// Save settings to `<dir>/.fmtx/config.toml`
///
/// Writes to a temp file first, then renames it into place.
pub fn save_settings(dir: &Path, settings: &Settings) -> Result<()> {
    let fmtx_dir = dir.join(FMTX_DIR);

    if !fmtx_dir.exists() {
        std::fs::create_dir_all(&fmtx_dir)
            .map_err(|e| Error::config(format!("Failed to create .fmtx dir: {}", e)))?;
    }

    let config_path = fmtx_dir.join(CONFIG_FILENAME);
    let temp_path = fmtx_dir.join(".config.toml.tmp");

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;

    let full_content = format!("# FM Transmitter Configuration\n\n{}", content);

    std::fs::write(&temp_path, &full_content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;

    std::fs::rename(&temp_path, &config_path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    debug!("Saved settings to {:?}", config_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmtx_core::{FmConfig, RadioBand};
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(temp.path());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_read_settings_reports_missing_and_malformed_files() {
        let temp = tempdir().unwrap();
        let err = read_settings(temp.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));

        let dir = temp.path().join(FMTX_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILENAME), "[radio\nband = ").unwrap();
        let err = read_settings(temp.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_settings_malformed_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join(FMTX_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILENAME), "[radio\nband = ").unwrap();

        let settings = load_settings(temp.path());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_init_config_dir_writes_parseable_defaults() {
        let temp = tempdir().unwrap();
        init_config_dir(temp.path()).unwrap();

        let settings = load_settings(temp.path());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_init_config_dir_keeps_existing_file() {
        let temp = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.transmitter.ps_text = "KEEPME".to_string();
        save_settings(temp.path(), &settings).unwrap();

        init_config_dir(temp.path()).unwrap();

        assert_eq!(load_settings(temp.path()).transmitter.ps_text, "KEEPME");
    }

    #[test]
    fn test_save_then_load_preserves_band() {
        let temp = tempdir().unwrap();
        let settings = Settings {
            radio: FmConfig::for_band(RadioBand::JapanWide),
            ..Settings::default()
        };
        save_settings(temp.path(), &settings).unwrap();

        let loaded = load_settings(temp.path());
        assert_eq!(loaded.radio.band, RadioBand::JapanWide);
        assert_eq!(loaded.radio.lower_limit.khz(), 76_000);
        assert!(!temp.path().join(FMTX_DIR).join(".config.toml.tmp").exists());
    }
}
