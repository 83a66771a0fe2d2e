//! Recovery engine: runs a category's ordered strategies, each under its
//! own time budget, and reports the first success.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::classifier::ErrorCategory;
use super::strategies::{
    bracket_fix, chunking, content_reduction, encoding_normalization, partial_lines, partial_sections,
    quote_escape, quote_fix, semicolon_fix, structure_guess, Budget, RecoveredOutput, RecoveryStrategy,
    StrategyOutcome,
};
use super::suggestions::manual_suggestions;
use crate::scanner::language_detect::Language;

/// Default per-strategy budget.
pub const DEFAULT_RECOVERY_BUDGET: Duration = Duration::from_millis(50);

/// One strategy attempt, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyAttempt {
    pub strategy: RecoveryStrategy,
    pub success: bool,
    pub elapsed_us: u64,
}

/// Outcome of a recovery run.
#[derive(Debug, Clone)]
pub struct RecoveryResult {
    pub success: bool,
    pub category: ErrorCategory,
    pub strategy: Option<RecoveryStrategy>,
    pub output: Option<RecoveredOutput>,
    pub changes: Vec<String>,
    pub confidence: f64,
    /// Manual suggestions, filled only when every strategy failed.
    pub suggestions: Vec<String>,
    pub attempts: Vec<StrategyAttempt>,
}

impl RecoveryResult {
    /// Repaired content, when the winning strategy produced content.
    pub fn fixed_content(&self) -> Option<&str> {
        match &self.output {
            Some(RecoveredOutput::Content(content)) => Some(content),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecoveryEngine {
    budget: Duration,
}

impl Default for RecoveryEngine {
    fn default() -> Self {
        Self::new(DEFAULT_RECOVERY_BUDGET)
    }
}

impl RecoveryEngine {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// Ordered strategies for a category.
    pub fn strategies_for(category: ErrorCategory) -> &'static [RecoveryStrategy] {
        use RecoveryStrategy::*;
        match category {
            ErrorCategory::BracketMismatch => &[BracketFix, PartialSections],
            ErrorCategory::QuoteMismatch => &[QuoteFix, QuoteEscape],
            ErrorCategory::MissingSemicolon => &[SemicolonFix, PartialLines],
            ErrorCategory::EncodingError => &[EncodingNormalization, PartialLines],
            ErrorCategory::ResourceError => &[ContentReduction, Chunking],
            ErrorCategory::TimeoutError => &[ContentReduction, StructureGuess],
            ErrorCategory::ParseError => &[PartialSections, PartialLines],
            ErrorCategory::UnknownError => &[],
        }
    }

    /// Try the category's strategies in order. A strategy that panics or
    /// overruns its budget counts as failed.
    pub fn recover(
        &self,
        category: ErrorCategory,
        error: &str,
        file: &str,
        content: &[u8],
        language: Language,
    ) -> RecoveryResult {
        let text = String::from_utf8_lossy(content);
        let mut attempts = Vec::new();

        for &strategy in Self::strategies_for(category) {
            let budget = Budget::new(self.budget);
            let start = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                run_strategy(strategy, &text, content, language, &budget)
            }));
            let elapsed = start.elapsed();
            let elapsed_us = elapsed.as_micros() as u64;

            match outcome {
                Ok(Some(outcome)) if elapsed <= self.budget => {
                    tracing::debug!(
                        file,
                        error_category = category.as_str(),
                        strategy = strategy.name(),
                        elapsed_us,
                        "recovery strategy succeeded"
                    );
                    attempts.push(StrategyAttempt {
                        strategy,
                        success: true,
                        elapsed_us,
                    });
                    return RecoveryResult {
                        success: true,
                        category,
                        strategy: Some(strategy),
                        output: Some(outcome.output),
                        changes: outcome.changes,
                        confidence: outcome.confidence,
                        suggestions: Vec::new(),
                        attempts,
                    };
                }
                Ok(Some(_)) => {
                    tracing::debug!(file, strategy = strategy.name(), elapsed_us, "recovery strategy over budget");
                }
                Ok(None) => {
                    tracing::debug!(file, strategy = strategy.name(), "recovery strategy not applicable");
                }
                Err(_) => {
                    tracing::warn!(file, strategy = strategy.name(), "recovery strategy panicked");
                }
            }
            attempts.push(StrategyAttempt {
                strategy,
                success: false,
                elapsed_us,
            });
        }

        tracing::debug!(file, error_category = category.as_str(), error, "recovery failed");
        RecoveryResult {
            success: false,
            category,
            strategy: None,
            output: None,
            changes: Vec::new(),
            confidence: 0.0,
            suggestions: manual_suggestions(category).iter().map(|s| s.to_string()).collect(),
            attempts,
        }
    }
}

fn run_strategy(
    strategy: RecoveryStrategy,
    text: &str,
    raw: &[u8],
    language: Language,
    budget: &Budget,
) -> Option<StrategyOutcome> {
    match strategy {
        RecoveryStrategy::BracketFix => bracket_fix(text),
        RecoveryStrategy::QuoteFix => quote_fix(text),
        RecoveryStrategy::QuoteEscape => quote_escape(text),
        RecoveryStrategy::SemicolonFix => semicolon_fix(text, language, budget),
        RecoveryStrategy::EncodingNormalization => encoding_normalization(raw),
        RecoveryStrategy::ContentReduction => content_reduction(text),
        RecoveryStrategy::Chunking => chunking(text, budget),
        RecoveryStrategy::StructureGuess => structure_guess(text),
        RecoveryStrategy::PartialSections => partial_sections(text, budget),
        RecoveryStrategy::PartialLines => partial_lines(text, budget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::classifier::{classify, has_unbalanced_brackets};

    #[test]
    fn unexpected_brace_scenario() {
        let content = b"function f() {\n  return 1;\n}\n}\n";
        let category = classify("Unexpected token }", content);
        assert_eq!(category, ErrorCategory::BracketMismatch);

        let result = RecoveryEngine::default().recover(category, "Unexpected token }", "f.js", content, Language::JavaScript);
        assert!(result.success);
        assert_eq!(result.strategy, Some(RecoveryStrategy::BracketFix));
        assert!((result.confidence - 0.7).abs() < 1e-9);
        assert!(!has_unbalanced_brackets(result.fixed_content().unwrap()));
    }

    #[test]
    fn unknown_category_reports_suggestions() {
        let result = RecoveryEngine::default().recover(ErrorCategory::UnknownError, "??", "x.py", b"x", Language::Python);
        assert!(!result.success);
        assert!(result.attempts.is_empty());
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn falls_through_to_second_strategy() {
        // Balanced content: bracket_fix declines, partial_sections takes over.
        let content = b"def a():\n    pass\n";
        let result = RecoveryEngine::default().recover(
            ErrorCategory::BracketMismatch,
            "Unexpected token",
            "a.py",
            content,
            Language::Python,
        );
        assert!(result.success);
        assert_eq!(result.strategy, Some(RecoveryStrategy::PartialSections));
        assert_eq!(result.attempts.len(), 2);
        assert!(!result.attempts[0].success);
    }

    #[test]
    fn every_category_has_a_strategy_table() {
        for category in ErrorCategory::all() {
            let strategies = RecoveryEngine::strategies_for(*category);
            if *category == ErrorCategory::UnknownError {
                assert!(strategies.is_empty());
            } else {
                assert_eq!(strategies.len(), 2);
            }
        }
    }
}
