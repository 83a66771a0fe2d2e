//! Structured field names used in tracing events across polyglot.
//!
//! Consistent names make log queries and dashboards line up.

/// Orchestrator: winning strategy name.
pub const PARSE_STRATEGY: &str = "parse_strategy";

/// Orchestrator: time spent in one file, in microseconds.
pub const PARSE_TIME_US: &str = "parse_time_us";

/// Recovery: classified error category.
pub const ERROR_CATEGORY: &str = "error_category";

/// Cache: hit rate (0.0 - 1.0).
pub const CACHE_HIT_RATE: &str = "cache_hit_rate";

/// Graph: construction time in milliseconds.
pub const GRAPH_BUILD_TIME: &str = "graph_build_time";

/// Graph: number of cross-language edges.
pub const CROSS_LANGUAGE_EDGES: &str = "cross_language_edges";

/// Patterns: detection time in milliseconds.
pub const PATTERN_DETECTION_TIME: &str = "pattern_detection_time";
