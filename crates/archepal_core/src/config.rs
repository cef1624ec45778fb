//! Core configuration loaded from TOML.
//!
//! # Responsibility
//! - Describe every tunable of the core with a usable default.
//! - Reject configurations that would fail later at runtime.
//!
//! # Invariants
//! - Every field is optional in the file; missing sections take defaults.
//! - [`load`] and [`parse`] always run [`CoreConfig::validate`].

use crate::logging::{default_log_level, normalize_level};
use crate::search::recency::RECENT_WINDOW_DAYS;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_WEATHER_API_BASE: &str = "https://api.open-meteo.com";
pub const DEFAULT_WEATHER_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub weather: WeatherConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files. Defaults to a directory under
    /// the system temp dir.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn log_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("archepal").join("logs"))
    }
}

/// Document store location. `None` keeps the store in memory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_base: String,
    pub timeout_ms: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_WEATHER_API_BASE.to_string(),
            timeout_ms: DEFAULT_WEATHER_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Width of the "recent" window, in days.
    pub recent_window_days: i64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            recent_window_days: RECENT_WINDOW_DAYS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Validation(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config TOML: {err}"),
            Self::Validation(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Validation(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

pub fn load(path: &Path) -> Result<CoreConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&raw)
}

pub fn parse(raw: &str) -> Result<CoreConfig, ConfigError> {
    let cfg: CoreConfig = toml::from_str(raw)?;
    cfg.validate()?;
    Ok(cfg)
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.logging.level).map_err(ConfigError::Validation)?;
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Validation(format!(
                    "logging.dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        if self.weather.api_base.trim().is_empty() {
            return Err(ConfigError::Validation(
                "weather.api_base must be non-empty.".to_string(),
            ));
        }
        if self.weather.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "weather.timeout_ms must be greater than zero.".to_string(),
            ));
        }
        if self.catalog.recent_window_days <= 0 {
            return Err(ConfigError::Validation(
                "catalog.recent_window_days must be greater than zero.".to_string(),
            ));
        }
        Ok(())
    }
}
