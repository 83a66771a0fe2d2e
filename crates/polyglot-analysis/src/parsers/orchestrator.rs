//! Parse orchestrator: primary parser → classify → recover → fallback → empty.
//!
//! `parse` never fails. Every degradation is visible in the returned
//! result's `strategy`, `confidence`, `warning` and `error` fields, and is
//! emitted as an event.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use polyglot_core::config::ParserConfig;
use polyglot_core::errors::ParseError;
use polyglot_core::events::types::{
    EmptyResultEvent, ErrorRecoveredEvent, FallbackUsedEvent, FileParsedEvent, ParseFailedEvent,
};
use polyglot_core::events::EventDispatcher;

use super::registry::ParserRegistry;
use super::timeout::parse_with_timeout;
use super::traits::LanguageParser;
use super::types::{ParseResult, RecoveryInfo};
use crate::fallback::{fallback_result, regex_extract, FallbackParser};
use crate::recovery::{classify, RecoveredOutput, RecoveryEngine, RecoveryResult};
use crate::scanner::hasher::hash_content;
use crate::scanner::language_detect::Language;

/// Default hard timeout for the primary parser.
pub const DEFAULT_PRIMARY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ParseOrchestrator {
    registry: ParserRegistry,
    recovery: RecoveryEngine,
    fallback: FallbackParser,
    primary_timeout: Duration,
    events: EventDispatcher,
}

impl ParseOrchestrator {
    /// Orchestrator with default budgets.
    pub fn new(registry: ParserRegistry) -> Self {
        Self {
            registry,
            recovery: RecoveryEngine::default(),
            fallback: FallbackParser::default(),
            primary_timeout: DEFAULT_PRIMARY_TIMEOUT,
            events: EventDispatcher::default(),
        }
    }

    /// Orchestrator with budgets from `[parser]` config.
    pub fn from_config(registry: ParserRegistry, config: &ParserConfig) -> Self {
        Self {
            registry,
            recovery: RecoveryEngine::new(config.recovery_budget()),
            fallback: FallbackParser::new(config.fallback_budget()),
            primary_timeout: config.primary_timeout(),
            events: EventDispatcher::default(),
        }
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    pub fn fallback(&self) -> &FallbackParser {
        &self.fallback
    }

    /// Parse with the registered primary parser for `language`.
    pub fn parse(&self, file: &str, content: &[u8], language: Language) -> ParseResult {
        self.parse_with_parser(file, content, language, self.registry.get(language))
    }

    /// Parse with an explicit primary parser (or none).
    pub fn parse_with_parser(
        &self,
        file: &str,
        content: &[u8],
        language: Language,
        primary: Option<Arc<dyn LanguageParser>>,
    ) -> ParseResult {
        let _span = tracing::debug_span!("parse", file, language = language.id()).entered();
        let start = Instant::now();
        let content_hash = hash_content(content);

        let mut result = self.run_stages(file, content, language, content_hash, primary);
        result.parse_time_us = start.elapsed().as_micros() as u64;

        tracing::debug!(
            parse_strategy = %result.strategy,
            confidence = result.confidence,
            parse_time_us = result.parse_time_us,
            "file parsed"
        );
        self.events.emit_file_parsed(&FileParsedEvent {
            file: file.to_string(),
            strategy: result.strategy.clone(),
            from_fallback: result.from_fallback,
            confidence: result.confidence,
            duration_us: result.parse_time_us,
        });
        result
    }

    fn run_stages(
        &self,
        file: &str,
        content: &[u8],
        language: Language,
        content_hash: u64,
        primary: Option<Arc<dyn LanguageParser>>,
    ) -> ParseResult {
        let error = match primary {
            Some(parser) => {
                match parse_with_timeout(parser, Arc::from(content), PathBuf::from(file), self.primary_timeout) {
                    Ok(parsed) => return ParseResult::from_primary(file, language, content_hash, parsed),
                    Err(e) => Some(e),
                }
            }
            None => None,
        };

        let error_message = match &error {
            Some(e) => e.to_string(),
            None => ParseError::UnsupportedLanguage {
                language: language.name().to_string(),
            }
            .to_string(),
        };

        // Languages without a primary parser skip recovery: there is no
        // parser failure to classify.
        if let Some(error) = &error {
            let category = classify(&classification_text(error), content);
            tracing::debug!(error_category = category.as_str(), error = %error_message, "primary parser failed");
            self.events.emit_parse_failed(&ParseFailedEvent {
                file: file.to_string(),
                category: category.as_str().to_string(),
                message: error_message.clone(),
            });

            let recovery = self.recovery.recover(category, &error_message, file, content, language);
            if let Some(result) = self.recovered_result(file, language, content_hash, &error_message, recovery) {
                return result;
            }
        }

        let text = String::from_utf8_lossy(content);
        match self.fallback.try_extract(&text, language) {
            Some(outcome) => {
                self.events.emit_fallback_used(&FallbackUsedEvent {
                    file: file.to_string(),
                    language: language.id().to_string(),
                    strategy: outcome.strategy.name().to_string(),
                });
                fallback_result(file, language, content_hash, outcome, Some(error_message))
            }
            None => {
                tracing::warn!(error = %error_message, "all parsing strategies failed; returning empty result");
                self.events.emit_empty_result(&EmptyResultEvent {
                    file: file.to_string(),
                    error: error_message.clone(),
                });
                ParseResult::empty(file, language, content_hash, Some(error_message))
            }
        }
    }

    /// Turn a successful recovery into a result. Repaired content is mined
    /// heuristically; a guessed structure is used as is.
    fn recovered_result(
        &self,
        file: &str,
        language: Language,
        content_hash: u64,
        error_message: &str,
        recovery: RecoveryResult,
    ) -> Option<ParseResult> {
        if !recovery.success {
            return None;
        }
        let strategy = recovery.strategy?;
        let fixed_content = recovery.fixed_content().map(str::to_string);
        let parsed = match recovery.output? {
            RecoveredOutput::Content(content) => regex_extract(&content, language),
            RecoveredOutput::Structure(parsed) => parsed,
        };

        self.events.emit_error_recovered(&ErrorRecoveredEvent {
            file: file.to_string(),
            category: recovery.category.as_str().to_string(),
            strategy: strategy.name().to_string(),
            confidence: recovery.confidence,
        });

        Some(ParseResult {
            file: file.to_string(),
            language,
            content_hash,
            success: true,
            ast: parsed.ast,
            functions: parsed.functions,
            classes: parsed.classes,
            imports: parsed.imports,
            complexity: parsed.complexity.max(1),
            error: Some(error_message.to_string()),
            from_fallback: true,
            strategy: strategy.name().to_string(),
            warning: Some(format!(
                "recovered from {} via {}; repaired content was not re-validated",
                recovery.category,
                strategy.name()
            )),
            confidence: recovery.confidence,
            recovery: Some(RecoveryInfo {
                category: recovery.category.as_str().to_string(),
                strategy: strategy.name().to_string(),
                changes: recovery.changes,
                confidence: recovery.confidence,
                fixed_content,
            }),
            parse_time_us: 0,
        })
    }
}

/// Text fed to the classifier: the parser's own message without the file
/// path, prefixed with the failure kind.
fn classification_text(error: &ParseError) -> String {
    match error {
        ParseError::Syntax { message, .. } => format!("syntax error: {message}"),
        ParseError::Encoding { message, .. } => format!("encoding error: {message}"),
        ParseError::Resource { message, .. } => format!("resource error: {message}"),
        ParseError::Timeout { timeout_ms, .. } => format!("timeout after {timeout_ms}ms"),
        ParseError::Panicked { .. } => "parser panicked".to_string(),
        ParseError::GrammarNotFound { language } => format!("grammar not found for {language}"),
        ParseError::UnsupportedLanguage { language } => format!("no parser for {language}"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use polyglot_core::events::PolyglotEventHandler;

    use super::*;
    use crate::parsers::types::{ParsedSource, STRATEGY_EMPTY, STRATEGY_PRIMARY};
    use crate::recovery::ErrorCategory;

    struct FailingParser(&'static str);

    impl LanguageParser for FailingParser {
        fn language(&self) -> Language {
            Language::JavaScript
        }
        fn extensions(&self) -> &[&str] {
            &["js"]
        }
        fn parse(&self, _source: &[u8], path: &Path) -> Result<ParsedSource, ParseError> {
            Err(ParseError::Syntax {
                path: path.to_path_buf(),
                message: self.0.to_string(),
            })
        }
    }

    #[derive(Default)]
    struct Counter {
        failed: AtomicUsize,
        recovered: AtomicUsize,
        fallback: AtomicUsize,
        empty: AtomicUsize,
    }

    impl PolyglotEventHandler for Counter {
        fn on_parse_failed(&self, _: &ParseFailedEvent) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
        fn on_error_recovered(&self, _: &ErrorRecoveredEvent) {
            self.recovered.fetch_add(1, Ordering::SeqCst);
        }
        fn on_fallback_used(&self, _: &FallbackUsedEvent) {
            self.fallback.fetch_add(1, Ordering::SeqCst);
        }
        fn on_empty_result(&self, _: &EmptyResultEvent) {
            self.empty.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn orchestrator_with_counter() -> (ParseOrchestrator, Arc<Counter>) {
        let counter = Arc::new(Counter::default());
        let mut events = EventDispatcher::new();
        events.register(counter.clone());
        (ParseOrchestrator::new(ParserRegistry::with_defaults()).with_events(events), counter)
    }

    #[test]
    fn primary_success() {
        let orchestrator = ParseOrchestrator::new(ParserRegistry::with_defaults());
        let result = orchestrator.parse("a.py", b"def f():\n    return 1\n", Language::Python);
        assert!(result.success);
        assert_eq!(result.strategy, STRATEGY_PRIMARY);
        assert_eq!(result.confidence, 1.0);
        assert!(!result.from_fallback);
        assert_eq!(result.functions[0].name, "f");
    }

    #[test]
    fn unexpected_brace_is_recovered_by_bracket_fix() {
        let (orchestrator, counter) = orchestrator_with_counter();
        let content = b"function f() {\n  return 1;\n}\n}\n";
        let result = orchestrator.parse_with_parser(
            "f.js",
            content,
            Language::JavaScript,
            Some(Arc::new(FailingParser("Unexpected token }"))),
        );
        assert!(result.success);
        assert_eq!(result.strategy, "bracket_fix");
        assert!((result.confidence - 0.7).abs() < 1e-9);
        let recovery = result.recovery.as_ref().unwrap();
        assert_eq!(recovery.category, "bracket_mismatch");
        assert!(recovery.fixed_content.is_some());
        assert!(result.error.as_deref().unwrap().contains("Unexpected token }"));
        assert_eq!(result.functions[0].name, "f");
        assert_eq!(counter.failed.load(Ordering::SeqCst), 1);
        assert_eq!(counter.recovered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn matched_quotes_are_not_rewritten_by_quote_recovery() {
        let orchestrator = ParseOrchestrator::new(ParserRegistry::with_defaults());
        let content = b"a = \"it's\"\nb = \"he's\"\n";
        let result = orchestrator.parse_with_parser(
            "q.js",
            content,
            Language::JavaScript,
            Some(Arc::new(FailingParser("unterminated string literal"))),
        );
        assert!(result.success);
        assert_ne!(result.strategy, "quote_fix");
        assert_ne!(result.strategy, "quote_escape");
        assert!(result.recovery.is_none());
    }

    #[test]
    fn zero_byte_file_yields_empty_result() {
        let (orchestrator, counter) = orchestrator_with_counter();
        let result = orchestrator.parse_with_parser(
            "empty.js",
            b"",
            Language::JavaScript,
            Some(Arc::new(FailingParser("Unexpected end of input"))),
        );
        assert!(result.success);
        assert_eq!(result.strategy, STRATEGY_EMPTY);
        assert!(result.functions.is_empty() && result.classes.is_empty() && result.imports.is_empty());
        assert_eq!(result.complexity, 1);
        assert!(result.warning.is_some());
        assert!(result.error.is_some());
        assert_eq!(counter.empty.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn language_without_parser_goes_to_fallback() {
        let (orchestrator, counter) = orchestrator_with_counter();
        let result = orchestrator.parse("Main.kt", b"class App\nfun main() {}\n", Language::Kotlin);
        assert!(result.success);
        assert!(result.from_fallback);
        assert_eq!(result.strategy, "regex_extraction");
        assert_eq!(result.complexity, 1 + 1 + 2);
        assert_eq!(counter.failed.load(Ordering::SeqCst), 0);
        assert_eq!(counter.fallback.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn real_syntax_error_degrades_gracefully() {
        let orchestrator = ParseOrchestrator::new(ParserRegistry::with_defaults());
        let result = orchestrator.parse("bad.py", b"def ok():\n    pass\n\ndef broken(:\n    pass\n", Language::Python);
        assert!(result.success);
        assert_ne!(result.strategy, STRATEGY_PRIMARY);
        assert!(result.confidence < 1.0);
        assert!(result.error.is_some());
    }

    #[test]
    fn classification_text_omits_path() {
        let error = ParseError::Syntax {
            path: "src/memory/timeout.js".into(),
            message: "Unexpected token }".into(),
        };
        assert_eq!(classify(&classification_text(&error), b""), ErrorCategory::BracketMismatch);
    }
}
