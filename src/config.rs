use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TrailError;
use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputSettings,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Report output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Default report format
    pub format: ReportFormat,

    /// Include the per-point grade series in text reports
    pub show_grade_series: bool,

    /// Maximum number of climbs listed in text reports
    pub max_segments: usize,
}

/// Report formats supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Invalid report format: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            logging: LogConfig::default(),
            output: OutputSettings::default(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            format: ReportFormat::Text,
            show_grade_series: false,
            max_segments: 10,
        }
    }
}

fn unknown_key(key: &str) -> TrailError {
    TrailError::Configuration(format!("Unknown configuration key: {}", key))
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str, kind: &str) -> crate::Result<T> {
    value
        .parse()
        .map_err(|_| TrailError::Configuration(format!("Invalid {} for {}: {}", kind, key, value)))
}

/// Keys accepted by [`AppConfig::get`] and [`AppConfig::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "logging.level",
    "logging.format",
    "logging.file_path",
    "logging.rotation",
    "output.format",
    "output.show_grade_series",
    "output.max_segments",
];

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".trailrs")
            .join("config.toml")
    }

    /// Load configuration from `path`, falling back to defaults when it is missing
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from_file(&config_path)
    }

    /// Read a setting by dotted key
    pub fn get(&self, key: &str) -> crate::Result<String> {
        let value = match key {
            "logging.level" => self.logging.level.to_string(),
            "logging.format" => self.logging.format.to_string(),
            "logging.file_path" => self
                .logging
                .file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "logging.rotation" => self.logging.rotation.to_string(),
            "output.format" => self.output.format.to_string(),
            "output.show_grade_series" => self.output.show_grade_series.to_string(),
            "output.max_segments" => self.output.max_segments.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Update a setting by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        match key {
            "logging.level" => {
                self.logging.level = value.parse().map_err(TrailError::Configuration)?
            }
            "logging.format" => {
                self.logging.format = value.parse().map_err(TrailError::Configuration)?
            }
            "logging.file_path" => {
                self.logging.file_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "logging.rotation" => self.logging.rotation = parse_value(key, value, "boolean")?,
            "output.format" => {
                self.output.format = value.parse().map_err(TrailError::Configuration)?
            }
            "output.show_grade_series" => {
                self.output.show_grade_series = parse_value(key, value, "boolean")?
            }
            "output.max_segments" => {
                self.output.max_segments = parse_value(key, value, "number")?
            }
            _ => return Err(unknown_key(key)),
        }

        self.metadata.updated_at = Utc::now();
        Ok(())
    }

    /// All settings as (key, value) pairs
    pub fn list(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}
