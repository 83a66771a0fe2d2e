//! Top-level polyglot configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, CacheConfig, ParserConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "polyglot.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`POLYGLOT_*`)
/// 3. Project config (`polyglot.toml` in project root)
/// 4. User config (`~/.polyglot/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolyglotConfig {
    pub analysis: AnalysisConfig,
    pub cache: CacheConfig,
    pub parser: ParserConfig,
}

/// Override arguments an embedder can apply on top of every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub enabled: Option<bool>,
    pub cache_enabled: Option<bool>,
    pub cache_max_age: Option<String>,
    pub cache_directory: Option<PathBuf>,
    pub threads: Option<usize>,
}

impl PolyglotConfig {
    /// Load configuration with layered resolution for a project root.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): programmatic overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing and embedding).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &PolyglotConfig) -> Result<(), ConfigError> {
        config.cache.effective_max_age()?;

        if config.cache.max_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "cache.max_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.analysis.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "analysis.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.parser.primary_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "parser.primary_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.polyglot/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".polyglot").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut PolyglotConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: PolyglotConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a value.
    fn merge(base: &mut PolyglotConfig, other: &PolyglotConfig) {
        // Analysis
        if other.analysis.enabled.is_some() {
            base.analysis.enabled = other.analysis.enabled;
        }
        if !other.analysis.supported_languages.is_empty() {
            base.analysis.supported_languages = other.analysis.supported_languages.clone();
        }
        if !other.analysis.exclude_patterns.is_empty() {
            base.analysis.exclude_patterns = other.analysis.exclude_patterns.clone();
        }
        if other.analysis.max_file_size.is_some() {
            base.analysis.max_file_size = other.analysis.max_file_size;
        }
        if other.analysis.threads.is_some() {
            base.analysis.threads = other.analysis.threads;
        }

        // Cache
        if other.cache.enabled.is_some() {
            base.cache.enabled = other.cache.enabled;
        }
        if other.cache.max_age.is_some() {
            base.cache.max_age = other.cache.max_age.clone();
        }
        if other.cache.max_size.is_some() {
            base.cache.max_size = other.cache.max_size;
        }
        if other.cache.directory.is_some() {
            base.cache.directory = other.cache.directory.clone();
        }

        // Parser budgets
        if other.parser.primary_timeout_ms.is_some() {
            base.parser.primary_timeout_ms = other.parser.primary_timeout_ms;
        }
        if other.parser.recovery_budget_ms.is_some() {
            base.parser.recovery_budget_ms = other.parser.recovery_budget_ms;
        }
        if other.parser.fallback_budget_ms.is_some() {
            base.parser.fallback_budget_ms = other.parser.fallback_budget_ms;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `POLYGLOT_CACHE_MAX_AGE`, `POLYGLOT_ANALYSIS_ENABLED`, etc.
    fn apply_env_overrides(config: &mut PolyglotConfig) {
        if let Ok(val) = std::env::var("POLYGLOT_ANALYSIS_ENABLED") {
            if let Ok(v) = val.parse::<bool>() {
                config.analysis.enabled = Some(v);
            }
        }
        if let Ok(val) = std::env::var("POLYGLOT_ANALYSIS_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.analysis.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("POLYGLOT_CACHE_ENABLED") {
            if let Ok(v) = val.parse::<bool>() {
                config.cache.enabled = Some(v);
            }
        }
        if let Ok(val) = std::env::var("POLYGLOT_CACHE_MAX_AGE") {
            config.cache.max_age = Some(val);
        }
        if let Ok(val) = std::env::var("POLYGLOT_CACHE_MAX_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.cache.max_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("POLYGLOT_CACHE_DIR") {
            config.cache.directory = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("POLYGLOT_PARSER_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.parser.primary_timeout_ms = Some(v);
            }
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut PolyglotConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.enabled {
            config.analysis.enabled = Some(v);
        }
        if let Some(v) = overrides.cache_enabled {
            config.cache.enabled = Some(v);
        }
        if let Some(ref v) = overrides.cache_max_age {
            config.cache.max_age = Some(v.clone());
        }
        if let Some(ref v) = overrides.cache_directory {
            config.cache.directory = Some(v.clone());
        }
        if let Some(v) = overrides.threads {
            config.analysis.threads = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
