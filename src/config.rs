//! Board configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::FetchLimits;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote joke API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint answering GET with one random joke
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Unique jokes to collect per refresh
    #[serde(default = "default_num_jokes")]
    pub num_jokes_to_get: usize,

    /// Requests allowed per refresh, duplicates included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wall-clock budget per refresh in seconds (optional)
    #[serde(default = "default_max_elapsed")]
    pub max_elapsed_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            num_jokes_to_get: default_num_jokes(),
            max_attempts: default_max_attempts(),
            max_elapsed_secs: default_max_elapsed(),
        }
    }
}

impl FetchConfig {
    pub fn limits(&self) -> FetchLimits {
        FetchLimits {
            max_attempts: self.max_attempts,
            max_elapsed: self.max_elapsed_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the snapshot file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Key the snapshot is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_key(),
        }
    }
}

// Defaults
fn default_endpoint() -> String { "https://icanhazdadjoke.com/".to_string() }
fn default_timeout() -> u64 { 10 }
fn default_user_agent() -> String {
    format!("dad-jokes/{} (https://github.com/dad-jokes/dad-jokes)", env!("CARGO_PKG_VERSION"))
}
fn default_num_jokes() -> usize { 10 }
fn default_max_attempts() -> u32 { 100 }
fn default_max_elapsed() -> Option<u64> { Some(60) }
fn default_data_dir() -> PathBuf { PathBuf::from(".dad-jokes") }
fn default_key() -> String { "jokes".to_string() }

impl Config {
    /// Load from a TOML file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
