//! PolyglotEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for handling polyglot events.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. The trait requires `Send + Sync`
/// because events fire from rayon workers.
pub trait PolyglotEventHandler: Send + Sync {
    // ---- Analysis Lifecycle ----
    fn on_analysis_started(&self, _event: &AnalysisStartedEvent) {}
    fn on_analysis_complete(&self, _event: &AnalysisCompleteEvent) {}

    // ---- Parse Orchestration ----
    fn on_file_parsed(&self, _event: &FileParsedEvent) {}
    fn on_parse_failed(&self, _event: &ParseFailedEvent) {}
    fn on_error_recovered(&self, _event: &ErrorRecoveredEvent) {}
    fn on_fallback_used(&self, _event: &FallbackUsedEvent) {}
    fn on_empty_result(&self, _event: &EmptyResultEvent) {}

    // ---- Cache ----
    fn on_cache_hit(&self, _event: &CacheLookupEvent) {}
    fn on_cache_miss(&self, _event: &CacheLookupEvent) {}

    // ---- Architecture ----
    fn on_pattern_detected(&self, _event: &PatternDetectedEvent) {}
    fn on_anti_pattern_detected(&self, _event: &AntiPatternDetectedEvent) {}

    // ---- Errors ----
    fn on_error(&self, _event: &ErrorEvent) {}
}
