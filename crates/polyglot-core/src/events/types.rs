//! Event payload types.

use std::path::PathBuf;

/// Payload for `on_analysis_started`.
#[derive(Debug, Clone)]
pub struct AnalysisStartedEvent {
    pub root: Option<PathBuf>,
    pub file_count: usize,
}

/// Payload for `on_file_parsed`.
#[derive(Debug, Clone)]
pub struct FileParsedEvent {
    pub file: String,
    pub strategy: String,
    pub from_fallback: bool,
    pub confidence: f64,
    pub duration_us: u64,
}

/// Payload for `on_parse_failed`: the primary parser failed or timed out.
#[derive(Debug, Clone)]
pub struct ParseFailedEvent {
    pub file: String,
    pub category: String,
    pub message: String,
}

/// Payload for `on_error_recovered`.
#[derive(Debug, Clone)]
pub struct ErrorRecoveredEvent {
    pub file: String,
    pub category: String,
    pub strategy: String,
    pub confidence: f64,
}

/// Payload for `on_fallback_used`.
#[derive(Debug, Clone)]
pub struct FallbackUsedEvent {
    pub file: String,
    pub language: String,
    pub strategy: String,
}

/// Payload for `on_empty_result`: every strategy failed.
#[derive(Debug, Clone)]
pub struct EmptyResultEvent {
    pub file: String,
    pub error: String,
}

/// Payload for `on_cache_hit` and `on_cache_miss`.
#[derive(Debug, Clone)]
pub struct CacheLookupEvent {
    pub file: String,
    pub branch: String,
}

/// Payload for `on_pattern_detected`.
#[derive(Debug, Clone)]
pub struct PatternDetectedEvent {
    pub pattern_type: String,
    pub confidence: f64,
    pub nodes: Vec<String>,
}

/// Payload for `on_anti_pattern_detected`.
#[derive(Debug, Clone)]
pub struct AntiPatternDetectedEvent {
    pub pattern_type: String,
    pub severity: String,
    pub nodes: Vec<String>,
}

/// Payload for `on_analysis_complete`.
#[derive(Debug, Clone)]
pub struct AnalysisCompleteEvent {
    pub files: usize,
    pub nodes: usize,
    pub edges: usize,
    pub cross_language_edges: usize,
    pub duration_ms: u64,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
