//! Configuration Management

use crate::analysis::{ExtractorConfig, DEFAULT_VERTICAL_REFERENCE_OFFSET};
use crate::live::DEFAULT_WINDOW_SECONDS;
use crate::workflow::recording::DEFAULT_THROTTLE_INTERVAL_SECS;
use crate::workflow::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Angle extraction settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Live display settings
    #[serde(default)]
    pub live: LiveConfig,
    /// Recording settings
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Export toggles
    #[serde(default)]
    pub export: ExportConfig,
}

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Height of the hip vertical reference above the hip (normalized units)
    pub vertical_reference_offset: f64,
}

/// Live window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Rolling window length (seconds)
    pub window_seconds: f64,
}

/// Recording configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Minimum spacing between recorded samples (seconds)
    pub throttle_interval_secs: f64,
    /// Mirror recorded samples to an angle log
    pub write_angle_log: bool,
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write the long-format series CSV
    pub write_csv: bool,
    /// Write the Markdown summary
    pub write_markdown: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            vertical_reference_offset: DEFAULT_VERTICAL_REFERENCE_OFFSET,
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            throttle_interval_secs: DEFAULT_THROTTLE_INTERVAL_SECS,
            write_angle_log: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            write_csv: true,
            write_markdown: true,
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let offset = self.analysis.vertical_reference_offset;
        if !offset.is_finite() || offset <= 0.0 {
            return Err(crate::Error::Config(format!(
                "vertical_reference_offset must be a positive number, got {}",
                offset
            )));
        }
        let window = self.live.window_seconds;
        if !window.is_finite() || window <= 0.0 {
            return Err(crate::Error::Config(format!(
                "window_seconds must be > 0, got {}",
                window
            )));
        }
        let throttle = self.recording.throttle_interval_secs;
        if !throttle.is_finite() || throttle < 0.0 {
            return Err(crate::Error::Config(format!(
                "throttle_interval_secs must be >= 0, got {}",
                throttle
            )));
        }
        Ok(())
    }

    /// Session tunables derived from this config
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            extractor: ExtractorConfig {
                vertical_reference_offset: self.analysis.vertical_reference_offset,
            },
            window_seconds: self.live.window_seconds,
            throttle_interval_secs: self.recording.throttle_interval_secs,
        }
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".joint_angles").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Look up a dotted key such as `live.window_seconds`
    pub fn get(&self, key: &str) -> Result<String, crate::Error> {
        let root = toml::Value::try_from(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        let mut value = &root;
        for part in key.split('.') {
            value = value
                .get(part)
                .ok_or_else(|| crate::Error::Config(format!("unknown config key '{}'", key)))?;
        }
        Ok(match value {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Return a copy with a dotted key replaced, validated.
    ///
    /// The value is parsed with the type of the existing entry.
    pub fn with_value(&self, key: &str, raw: &str) -> Result<Self, crate::Error> {
        let mut root =
            toml::Value::try_from(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        let unknown = || crate::Error::Config(format!("unknown config key '{}'", key));

        let (section, field) = key.split_once('.').ok_or_else(unknown)?;
        let slot = root
            .get_mut(section)
            .and_then(|s| s.get_mut(field))
            .ok_or_else(unknown)?;

        let replacement = match &*slot {
            toml::Value::Boolean(_) => toml::Value::Boolean(raw.parse().map_err(|_| {
                crate::Error::Config(format!("{} expects true or false, got '{}'", key, raw))
            })?),
            toml::Value::Float(_) | toml::Value::Integer(_) => {
                toml::Value::Float(raw.parse().map_err(|_| {
                    crate::Error::Config(format!("{} expects a number, got '{}'", key, raw))
                })?)
            }
            _ => toml::Value::String(raw.to_string()),
        };
        *slot = replacement;

        let config: Self = root
            .try_into()
            .map_err(|e: toml::de::Error| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
