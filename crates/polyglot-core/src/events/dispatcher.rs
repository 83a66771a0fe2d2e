//! EventDispatcher: synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::PolyglotEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn PolyglotEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn PolyglotEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler is logged and does not prevent subsequent
    /// handlers from receiving the event.
    fn emit<F: Fn(&dyn PolyglotEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                ::tracing::warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    // ---- Analysis Lifecycle ----
    pub fn emit_analysis_started(&self, event: &AnalysisStartedEvent) {
        self.emit(|h| h.on_analysis_started(event));
    }

    pub fn emit_analysis_complete(&self, event: &AnalysisCompleteEvent) {
        self.emit(|h| h.on_analysis_complete(event));
    }

    // ---- Parse Orchestration ----
    pub fn emit_file_parsed(&self, event: &FileParsedEvent) {
        self.emit(|h| h.on_file_parsed(event));
    }

    pub fn emit_parse_failed(&self, event: &ParseFailedEvent) {
        self.emit(|h| h.on_parse_failed(event));
    }

    pub fn emit_error_recovered(&self, event: &ErrorRecoveredEvent) {
        self.emit(|h| h.on_error_recovered(event));
    }

    pub fn emit_fallback_used(&self, event: &FallbackUsedEvent) {
        self.emit(|h| h.on_fallback_used(event));
    }

    pub fn emit_empty_result(&self, event: &EmptyResultEvent) {
        self.emit(|h| h.on_empty_result(event));
    }

    // ---- Cache ----
    pub fn emit_cache_hit(&self, event: &CacheLookupEvent) {
        self.emit(|h| h.on_cache_hit(event));
    }

    pub fn emit_cache_miss(&self, event: &CacheLookupEvent) {
        self.emit(|h| h.on_cache_miss(event));
    }

    // ---- Architecture ----
    pub fn emit_pattern_detected(&self, event: &PatternDetectedEvent) {
        self.emit(|h| h.on_pattern_detected(event));
    }

    pub fn emit_anti_pattern_detected(&self, event: &AntiPatternDetectedEvent) {
        self.emit(|h| h.on_anti_pattern_detected(event));
    }

    // ---- Errors ----
    pub fn emit_error(&self, event: &ErrorEvent) {
        self.emit(|h| h.on_error(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
