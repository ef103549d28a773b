//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::vote::DEFAULT_FINISH_THRESHOLD;
use crate::analysis::{DayRunPolicy, Locale, PipelineConfig};
use crate::capture::{CaptureConfig, Orientation};

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Recognition settings
    pub recognition: RecognitionSettings,
    /// Frame input settings
    pub capture: CaptureSettings,
}

impl AppConfig {
    /// Settings for the per-frame pipeline
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            locale: self.general.locale,
            day_run_policy: self.recognition.day_run_policy,
            min_confidence: self.recognition.min_confidence,
        }
    }

    /// Settings for frame loading and replay
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            orientation: self.capture.orientation,
            frame_interval_ms: self.capture.frame_interval_ms,
        }
    }
}

/// General application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Language of the signs being read
    pub locale: Locale,
}

/// Recognition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionSettings {
    /// Identical reads needed before a result is final
    pub finish_threshold: usize,
    /// What to do with day runs of more than two days
    pub day_run_policy: DayRunPolicy,
    /// Minimum OCR confidence for an observation to be used (0.0 - 1.0)
    pub min_confidence: f32,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            finish_threshold: DEFAULT_FINISH_THRESHOLD,
            day_run_policy: DayRunPolicy::Keep,
            min_confidence: 0.0,
        }
    }
}

/// Frame input settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Coordinate convention assumed for frames that do not name one
    pub orientation: Orientation,
    /// Delay between frames when replaying a recording
    pub frame_interval_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        let capture = CaptureConfig::default();
        Self {
            orientation: capture.orientation,
            frame_interval_ms: capture.frame_interval_ms,
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Result<PathBuf> {
    Ok(crate::storage::get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Invalid config {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.general.locale, Locale::En);

        assert_eq!(config.recognition.finish_threshold, 5);
        assert_eq!(config.recognition.day_run_policy, DayRunPolicy::Keep);
        assert_eq!(config.recognition.min_confidence, 0.0);

        assert_eq!(config.capture.orientation, Orientation::Display);
        assert_eq!(config.capture.frame_interval_ms, 33);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = AppConfig::default();
        config.general.locale = Locale::De;
        config.recognition.day_run_policy = DayRunPolicy::BestTwo;
        config.capture.orientation = Orientation::Normalized;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("locale = \"de\""));
        assert!(toml_str.contains("day_run_policy = \"best_two\""));

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.general.locale, Locale::De);
        assert_eq!(parsed.recognition.day_run_policy, DayRunPolicy::BestTwo);
        assert_eq!(parsed.capture.orientation, Orientation::Normalized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str("[recognition]\nfinish_threshold = 3\n").unwrap();
        assert_eq!(parsed.recognition.finish_threshold, 3);
        assert_eq!(parsed.recognition.day_run_policy, DayRunPolicy::Keep);
        assert_eq!(parsed.general.locale, Locale::En);
        assert_eq!(parsed.capture.frame_interval_ms, 33);
    }

    #[test]
    fn test_pipeline_config_from_settings() {
        let mut config = AppConfig::default();
        config.general.locale = Locale::De;
        config.recognition.min_confidence = 0.4;

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.locale, Locale::De);
        assert!((pipeline.min_confidence - 0.4).abs() < 0.001);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = AppConfig::default();
        config.capture.frame_interval_ms = 100;

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(loaded.capture.frame_interval_ms, 100);
        assert_eq!(loaded.recognition.finish_threshold, config.recognition.finish_threshold);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_locale_rejected() {
        let result: std::result::Result<AppConfig, _> = toml::from_str("[general]\nlocale = \"fr\"\n");
        assert!(result.is_err());
    }
}
