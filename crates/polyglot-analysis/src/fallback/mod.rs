//! Fallback parser: per-language heuristic extraction with a strategy-hint cache.

pub mod extractor;
pub mod hints;
pub mod patterns;

pub use extractor::{fallback_result, regex_extract, FallbackOutcome, FallbackParser};
pub use hints::{FallbackStrategy, StrategyHints};
