//! Configuration loading and bootstrap defaults
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Compiled defaults (this module)
//!
//! A missing TOML file is never fatal: the caller gets compiled defaults and a
//! warning in the log.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default HTTP listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5780;

/// Default auto-advance interval for the highlight reel
pub const DEFAULT_CAROUSEL_INTERVAL_MS: u64 = 3500;

/// Accepted auto-advance interval range (inclusive)
pub const CAROUSEL_INTERVAL_RANGE_MS: (u64, u64) = (1000, 60_000);

/// Default generative model used by the brief lab
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional; unset fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Listen address (e.g. "0.0.0.0")
    #[serde(default)]
    pub bind_addr: Option<String>,

    /// HTTP port
    #[serde(default)]
    pub port: Option<u16>,

    /// Highlight reel auto-advance interval
    #[serde(default)]
    pub carousel_interval_ms: Option<u64>,

    /// Generative model name for brief generation
    #[serde(default)]
    pub gemini_model: Option<String>,

    /// Provider credential for brief generation
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default configuration file location: `<config_dir>/folio/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("folio").join("config.toml"))
}

/// Read and parse a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
}

/// Where the effective TOML configuration came from
#[derive(Debug)]
pub enum ConfigSource {
    /// No config directory could be determined
    NoLocation,
    /// Expected file does not exist
    Missing(PathBuf),
    Loaded(PathBuf),
    /// File exists but could not be read or parsed
    Invalid(Error),
}

impl ConfigSource {
    /// Report the outcome; a missing file logs at info, a bad one warns
    pub fn log(&self) {
        match self {
            ConfigSource::NoLocation => {
                info!("No configuration file location available, using compiled defaults")
            }
            ConfigSource::Missing(path) => {
                info!("Config file {} not found, using compiled defaults", path.display())
            }
            ConfigSource::Loaded(path) => {
                info!("Loaded TOML configuration from {}", path.display())
            }
            ConfigSource::Invalid(e) => warn!("{} - using compiled defaults", e),
        }
    }
}

/// Load TOML configuration, degrading to defaults
///
/// Never fails and never logs, so it can run before the tracing subscriber
/// exists (the log level lives in this file). Call [`ConfigSource::log`]
/// once logging is up.
pub fn load_toml_config_or_default(path: Option<&Path>) -> (TomlConfig, ConfigSource) {
    let Some(path) = path else {
        return (TomlConfig::default(), ConfigSource::NoLocation);
    };

    if !path.exists() {
        return (TomlConfig::default(), ConfigSource::Missing(path.to_path_buf()));
    }

    match load_toml_config(path) {
        Ok(config) => (config, ConfigSource::Loaded(path.to_path_buf())),
        Err(e) => (TomlConfig::default(), ConfigSource::Invalid(e)),
    }
}

/// Validate a credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the auto-advance interval, falling back to the default when unset
/// or outside the accepted range
pub fn resolve_carousel_interval(value_ms: Option<u64>) -> Duration {
    let (min, max) = CAROUSEL_INTERVAL_RANGE_MS;
    match value_ms {
        Some(ms) if (min..=max).contains(&ms) => Duration::from_millis(ms),
        Some(ms) => {
            warn!(
                "carousel_interval_ms {} outside {}..={}, using default {}",
                ms, min, max, DEFAULT_CAROUSEL_INTERVAL_MS
            );
            Duration::from_millis(DEFAULT_CAROUSEL_INTERVAL_MS)
        }
        None => Duration::from_millis(DEFAULT_CAROUSEL_INTERVAL_MS),
    }
}
