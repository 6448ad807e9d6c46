//! TOML configuration parsing.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Collection endpoint to harvest.
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional group filter sent with the first request.
    #[serde(default)]
    pub group: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            group: None,
        }
    }
}

fn default_api_url() -> String {
    "https://api.sinopia.io/resource".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct HarvestConfig {
    /// Progress mode: `auto`, `off`, `human`, or `json`.
    #[serde(default = "default_progress")]
    pub progress: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            progress: default_progress(),
        }
    }
}

fn default_progress() -> String {
    "auto".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.api.url.is_empty() {
        anyhow::bail!("api.url must not be empty");
    }
    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs must be > 0");
    }

    Ok(config)
}

/// Load a config file if it exists, otherwise fall back to defaults.
///
/// The harvester is usable with no config at all; the file only overrides
/// the endpoint, timeout, group filter, and progress mode.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}
