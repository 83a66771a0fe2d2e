//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Default maximum file size considered for analysis: 1 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Configuration for the analysis subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Master switch for the analysis pipeline. Default: true.
    pub enabled: Option<bool>,
    /// Language names to analyze (e.g. "python", "go"). Empty = all known.
    #[serde(default)]
    pub supported_languages: Vec<String>,
    /// Extra glob patterns excluded from discovery, on top of the built-in list.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Files larger than this are skipped by discovery. Default: 1 MiB.
    pub max_file_size: Option<u64>,
    /// Worker threads for per-file work. Default: rayon's global pool.
    pub threads: Option<usize>,
}

impl AnalysisConfig {
    /// Returns whether analysis is enabled, defaulting to true.
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Returns the effective maximum file size, defaulting to 1 MiB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    /// Whether a language name is enabled. An empty allow-list enables all.
    pub fn language_enabled(&self, name: &str) -> bool {
        self.supported_languages.is_empty()
            || self
                .supported_languages
                .iter()
                .any(|l| l.eq_ignore_ascii_case(name))
    }
}
