use crate::error::{Result, SpeedupError};
use crate::silence::{ProportionalMargin, RawTimestamps};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Speed for spoken parts, clamped to `[0.2, 20]`.
    #[serde(alias = "playbackSpeed")]
    pub playback_speed: f64,
    /// Speed inside silences, clamped to `[0.2, 20]`.
    #[serde(alias = "silenceSpeed")]
    pub silence_speed: f64,
    /// Skip silences instead of playing them faster.
    #[serde(alias = "skipSilences")]
    pub skip_silences: bool,
    /// Replace the host's remaining time with the corrected estimate.
    #[serde(alias = "displayRealRemainingTime")]
    pub display_real_remaining_time: bool,
    pub timestamps: RawTimestamps,
    pub margin: ProportionalMargin,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback_speed: 1.0,
            silence_speed: 8.0,
            skip_silences: false,
            display_real_remaining_time: true,
            timestamps: RawTimestamps::default(),
            margin: ProportionalMargin::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                match Self::from_file(&config_path) {
                    Ok(file_config) => config = file_config,
                    Err(e) => warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }

        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str::<Config>(contents)?)
    }

    /// Override with environment variables
    fn apply_env(&mut self) {
        if let Ok(speed) = std::env::var("SPEEDUP_PLAYBACK_SPEED") {
            if let Ok(s) = speed.parse() {
                self.playback_speed = s;
            }
        }
        if let Ok(speed) = std::env::var("SPEEDUP_SILENCE_SPEED") {
            if let Ok(s) = speed.parse() {
                self.silence_speed = s;
            }
        }
        if let Ok(skip) = std::env::var("SPEEDUP_SKIP_SILENCES") {
            if let Some(b) = parse_flag(&skip) {
                self.skip_silences = b;
            }
        }
        if let Ok(display) = std::env::var("SPEEDUP_DISPLAY_REAL_REMAINING_TIME") {
            if let Some(b) = parse_flag(&display) {
                self.display_real_remaining_time = b;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.playback_speed.is_nan() || self.silence_speed.is_nan() {
            return Err(SpeedupError::Config(
                "Speeds must be numbers between 0.2 and 20".to_string(),
            ));
        }

        for (name, factor) in [
            ("margin.start_factor", self.margin.start_factor),
            ("margin.end_factor", self.margin.end_factor),
        ] {
            if !factor.is_finite() || factor < 0.0 {
                return Err(SpeedupError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, factor
                )));
            }
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("silence-speedup").join("config.toml"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.playback_speed, 1.0);
        assert_eq!(config.silence_speed, 8.0);
        assert!(!config.skip_silences);
        assert!(config.display_real_remaining_time);
        assert!(config.timestamps.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_with_camel_case_keys() {
        let config = Config::from_toml_str(
            r#"
            playbackSpeed = 1.5
            silenceSpeed = 4.0
            skipSilences = true
            displayRealRemainingTime = false
            "#,
        )
        .unwrap();

        assert_eq!(config.playback_speed, 1.5);
        assert_eq!(config.silence_speed, 4.0);
        assert!(config.skip_silences);
        assert!(!config.display_real_remaining_time);
    }

    #[test]
    fn test_toml_timestamps_and_margin() {
        let config = Config::from_toml_str(
            r#"
            silence_speed = 6.0
            timestamps = [{ start = 10.0, end = 20.0 }, { start = 30.0, end = 32.5 }]

            [margin]
            start_factor = 0.1
            "#,
        )
        .unwrap();

        assert_eq!(config.timestamps.len(), 2);
        assert_eq!(config.margin.start_factor, 0.1);
        assert_eq!(config.margin.end_factor, 0.12);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "playback_speed = 1.2").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.playback_speed, 1.2);
        assert_eq!(config.silence_speed, 8.0);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml_str("playback_speed = \"fast\""),
            Err(SpeedupError::Toml(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_margin() {
        let mut config = Config::default();
        config.margin.end_factor = -0.1;
        assert!(config.validate().is_err());

        config.margin.end_factor = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan_speed() {
        let config = Config {
            silence_speed: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
