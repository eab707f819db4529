//! Configuration for cache TTLs, retry policy, and fetch defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration, loadable from TOML. Every section and field has
/// a default, so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| Error::config(format!("invalid config {}: {e}", path.display())))
    }
}

/// TTLs for the two cache tiers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Seconds a cached media page stays fresh.
    #[serde(default = "default_media_ttl_secs")]
    pub media_ttl_secs: u64,

    /// Seconds a cached provider descriptor stays fresh.
    #[serde(default = "default_metadata_ttl_secs")]
    pub metadata_ttl_secs: u64,
}

impl CacheConfig {
    pub fn media_ttl(&self) -> Duration {
        Duration::from_secs(self.media_ttl_secs)
    }

    pub fn metadata_ttl(&self) -> Duration {
        Duration::from_secs(self.metadata_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            media_ttl_secs: default_media_ttl_secs(),
            metadata_ttl_secs: default_metadata_ttl_secs(),
        }
    }
}

fn default_media_ttl_secs() -> u64 {
    300
}

fn default_metadata_ttl_secs() -> u64 {
    21_600
}

/// Retry policy for transient adapter failures.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Total attempts per adapter call, first try included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry; doubles after each transient failure.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    250
}

/// Defaults applied to fetch requests.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Page size used when a request does not specify one.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    200
}
