//! Analysis cache configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration::parse_duration;
use crate::errors::ConfigError;

/// Default max-age for cache entries.
pub const DEFAULT_MAX_AGE: &str = "2h";

/// Default maximum number of cache entries kept after LRU eviction.
pub const DEFAULT_MAX_SIZE: u64 = 10_000;

/// Default cache directory, relative to the project root.
pub const DEFAULT_CACHE_DIR: &str = ".polyglot/cache";

/// Configuration for the analysis cache.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the analysis cache. Default: true.
    pub enabled: Option<bool>,
    /// Maximum entry age as a duration string ("2h", "30m", "1h30m"). Default: "2h".
    pub max_age: Option<String>,
    /// Maximum number of entries retained by LRU eviction. Default: 10000.
    pub max_size: Option<u64>,
    /// Cache directory. Relative paths resolve against the project root.
    pub directory: Option<PathBuf>,
}

impl CacheConfig {
    /// Returns whether the cache is enabled, defaulting to true.
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Parse the configured max-age, defaulting to two hours.
    pub fn effective_max_age(&self) -> Result<Duration, ConfigError> {
        let raw = self.max_age.as_deref().unwrap_or(DEFAULT_MAX_AGE);
        parse_duration(raw).map_err(|message| ConfigError::InvalidValue {
            field: "cache.max_age".to_string(),
            message,
        })
    }

    /// Returns the effective maximum entry count.
    pub fn effective_max_size(&self) -> u64 {
        self.max_size.unwrap_or(DEFAULT_MAX_SIZE)
    }

    /// Resolve the cache directory against a project root.
    pub fn effective_directory(&self, project_root: &std::path::Path) -> PathBuf {
        match &self.directory {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => project_root.join(dir),
            None => project_root.join(DEFAULT_CACHE_DIR),
        }
    }
}
