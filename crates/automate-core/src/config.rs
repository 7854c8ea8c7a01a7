//! Persistent configuration for automate.
//!
//! Stores gesture defaults in `~/.automate/config.json`. The path can be
//! overridden with the `AUTOMATE_CONFIG` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use automate_core::config::AutomateConfig;
//! use automate_core::reveal::RevealOptions;
//!
//! // Load (returns defaults if file doesn't exist)
//! let config = AutomateConfig::load();
//! let options = RevealOptions::from(&config);
//! assert!(options.swipe_length > 0.0);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::driver::DEFAULT_PRESS_SECS;

const CONFIG_DIRNAME: &str = ".automate";
const CONFIG_FILENAME: &str = "config.json";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "AUTOMATE_CONFIG";

/// Errors reading, writing or editing the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Persistent automate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomateConfig {
    /// Fraction of the visible region covered by each reveal swipe.
    pub swipe_length: f64,
    /// How long a swipe presses before it starts dragging, in seconds.
    pub press_duration_secs: f64,
    /// Whether reveals exclude the on-screen keyboard from the visible region.
    pub avoid_keyboard: bool,
    /// Largest per-component frame difference still treated as "no movement".
    pub frame_tolerance: f64,
}

impl Default for AutomateConfig {
    fn default() -> Self {
        Self {
            swipe_length: 0.9,
            press_duration_secs: DEFAULT_PRESS_SECS,
            avoid_keyboard: true,
            frame_tolerance: 0.0,
        }
    }
}

/// Returns the automate home directory, `~/.automate`.
///
/// Falls back to the system temp directory when no home directory is known.
pub fn automate_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(CONFIG_DIRNAME)
}

/// Returns the config file path, honoring [`CONFIG_ENV`].
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => automate_dir().join(CONFIG_FILENAME),
    }
}

/// Whether `v` is a usable swipe length: finite and in `(0, 1]`.
pub fn valid_swipe_length(v: f64) -> bool {
    v.is_finite() && v > 0.0 && v <= 1.0
}

/// Whether `v` is a usable duration or tolerance: finite and `>= 0`.
pub fn valid_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn parse_checked(key: &str, value: &str, valid: fn(f64) -> bool) -> Result<f64, ConfigError> {
    match value.trim().parse::<f64>() {
        Ok(v) if valid(v) => Ok(v),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parses a swipe length, rejecting values outside `(0, 1]`.
pub fn parse_swipe_length(value: &str) -> Result<f64, ConfigError> {
    parse_checked("swipe_length", value, valid_swipe_length)
}

/// Parses a frame tolerance, rejecting negative and non-finite values.
pub fn parse_frame_tolerance(value: &str) -> Result<f64, ConfigError> {
    parse_checked("frame_tolerance", value, valid_non_negative)
}

impl AutomateConfig {
    /// Keys accepted by [`set`](Self::set).
    pub const KEYS: [&'static str; 4] = [
        "swipe_length",
        "press_duration_secs",
        "avoid_keyboard",
        "frame_tolerance",
    ];

    /// Load config from [`config_path`].
    ///
    /// Returns [`Default`] if the file does not exist, cannot be parsed, or
    /// holds out-of-range values.
    pub fn load() -> Self {
        let path = config_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from an explicit path, rejecting out-of-range values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every numeric field against the same rules [`set`](Self::set) applies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&str, f64, fn(f64) -> bool); 3] = [
            ("swipe_length", self.swipe_length, valid_swipe_length),
            ("press_duration_secs", self.press_duration_secs, valid_non_negative),
            ("frame_tolerance", self.frame_tolerance, valid_non_negative),
        ];
        for (key, value, valid) in checks {
            if !valid(value) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Save config to [`config_path`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_path())
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Update one field from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "swipe_length" => self.swipe_length = parse_swipe_length(value)?,
            "press_duration_secs" => {
                self.press_duration_secs = parse_checked(key, value, valid_non_negative)?
            }
            "avoid_keyboard" => {
                self.avoid_keyboard = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                })?
            }
            "frame_tolerance" => self.frame_tolerance = parse_frame_tolerance(value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_gesture_constants() {
        let config = AutomateConfig::default();
        assert_eq!(config.swipe_length, 0.9);
        assert_eq!(config.press_duration_secs, 0.1);
        assert!(config.avoid_keyboard);
        assert_eq!(config.frame_tolerance, 0.0);
    }

    #[test]
    fn deserialize_partial_json_fills_defaults() {
        let loaded: AutomateConfig = serde_json::from_str(r#"{"frame_tolerance": 0.5}"#).unwrap();
        assert_eq!(loaded.frame_tolerance, 0.5);
        assert_eq!(loaded.swipe_length, 0.9);
        assert!(loaded.avoid_keyboard);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let path = std::env::temp_dir()
            .join(format!("automate-config-test-{}", std::process::id()))
            .join("config.json");
        let mut config = AutomateConfig::default();
        config.avoid_keyboard = false;
        config.save_to(&path).unwrap();

        let loaded = AutomateConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let err = AutomateConfig::load_from(Path::new("/nonexistent/automate/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn load_from_rejects_out_of_range_values() {
        let dir = std::env::temp_dir().join(format!("automate-config-range-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        for (name, json) in [
            ("negative-swipe", r#"{"swipe_length": -0.9}"#),
            ("long-swipe", r#"{"swipe_length": 1.5}"#),
            ("negative-tolerance", r#"{"frame_tolerance": -1.0}"#),
            ("negative-press", r#"{"press_duration_secs": -0.1}"#),
        ] {
            let path = dir.join(format!("{name}.json"));
            std::fs::write(&path, json).unwrap();
            let err = AutomateConfig::load_from(&path).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { .. }),
                "{name}: expected InvalidValue, got {err:?}"
            );
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn parsers_reject_non_finite_values() {
        assert_eq!(parse_frame_tolerance("0.5").unwrap(), 0.5);
        assert!(parse_frame_tolerance("NaN").is_err());
        assert!(parse_frame_tolerance("inf").is_err());
        assert!(parse_frame_tolerance("-0.5").is_err());

        assert_eq!(parse_swipe_length("1").unwrap(), 1.0);
        assert!(parse_swipe_length("NaN").is_err());
        assert!(parse_swipe_length("0").is_err());
        assert!(parse_swipe_length("-0.9").is_err());
    }

    #[test]
    fn set_parses_and_validates() {
        let mut config = AutomateConfig::default();
        config.set("swipe_length", "0.5").unwrap();
        config.set("avoid_keyboard", "false").unwrap();
        assert_eq!(config.swipe_length, 0.5);
        assert!(!config.avoid_keyboard);

        assert!(matches!(
            config.set("swipe_length", "1.5"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("frame_tolerance", "-1"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("avoid_keyboard", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(config.set("speed", "1"), Err(ConfigError::UnknownKey(_))));
    }
}
