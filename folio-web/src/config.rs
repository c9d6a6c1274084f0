//! Runtime configuration resolution for folio-web
//!
//! Combines command-line/environment overrides (parsed by clap in `main`) with
//! the TOML file and compiled defaults.

use folio_common::config::{
    is_valid_key, resolve_carousel_interval, TomlConfig, DEFAULT_BIND_ADDR, DEFAULT_GEMINI_MODEL,
    DEFAULT_PORT,
};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the brief provider credential
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Values supplied on the command line or through their `env` fallbacks
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_addr: Option<String>,
    pub port: Option<u16>,
    pub carousel_interval_ms: Option<u64>,
    pub gemini_model: Option<String>,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub bind_addr: String,
    pub port: u16,
    pub carousel_interval: Duration,
    pub gemini_model: String,
    /// `None` leaves the brief lab disabled
    pub gemini_api_key: Option<String>,
}

impl SiteConfig {
    /// Resolve every setting: overrides, then TOML, then defaults
    pub fn resolve(overrides: Overrides, toml_config: &TomlConfig) -> Self {
        let bind_addr = overrides
            .bind_addr
            .or_else(|| toml_config.bind_addr.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let port = overrides.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);

        let carousel_interval = resolve_carousel_interval(
            overrides
                .carousel_interval_ms
                .or(toml_config.carousel_interval_ms),
        );

        let gemini_model = overrides
            .gemini_model
            .or_else(|| toml_config.gemini_model.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Self {
            bind_addr,
            port,
            carousel_interval,
            gemini_model,
            gemini_api_key: resolve_gemini_api_key(toml_config),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            carousel_interval: resolve_carousel_interval(None),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_key: None,
        }
    }
}

/// Resolve the brief provider credential
///
/// **Priority:** ENV → TOML. A missing key is not an error: brief generation
/// is simply unavailable.
pub fn resolve_gemini_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(GEMINI_API_KEY_ENV)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .gemini_api_key
        .clone()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Gemini API key found in environment and TOML. Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("Gemini API key loaded from environment variable");
        return Some(key.trim().to_string());
    }

    if let Some(key) = toml_key {
        info!("Gemini API key loaded from TOML config");
        return Some(key.trim().to_string());
    }

    warn!(
        "Gemini API key not configured; brief generation disabled. Set {} or gemini_api_key in the TOML config.",
        GEMINI_API_KEY_ENV
    );
    None
}
