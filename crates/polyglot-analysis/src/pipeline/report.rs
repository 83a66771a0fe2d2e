//! Analysis report returned to callers.

use serde::Serialize;

use polyglot_core::errors::{PipelineError, PolyglotErrorCode};
use polyglot_core::types::collections::BTreeMap;

use crate::cache::CacheStatsSnapshot;
use crate::graph::{DependencyGraph, InterfaceDescriptor};
use crate::parsers::types::{ParseResult, STRATEGY_EMPTY, STRATEGY_PRIMARY};
use crate::patterns::{AntiPattern, Pattern, Recommendation};
use crate::scanner::language_detect::Language;

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub files_submitted: usize,
    pub files_analyzed: usize,
    pub files_failed: usize,
    pub files_cancelled: usize,
    pub primary: usize,
    pub recovered: usize,
    pub fallback: usize,
    pub empty: usize,
    pub interfaces: usize,
    pub duration_ms: u64,
    pub cache: CacheStatsSnapshot,
}

impl RunStats {
    /// Count a result under the stage that produced it.
    pub fn record_result(&mut self, result: &ParseResult) {
        self.files_analyzed += 1;
        match result.strategy.as_str() {
            STRATEGY_PRIMARY => self.primary += 1,
            STRATEGY_EMPTY => self.empty += 1,
            _ if result.recovery.is_some() => self.recovered += 1,
            _ => self.fallback += 1,
        }
    }
}

/// A non-fatal error, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedError {
    pub code: &'static str,
    pub message: String,
}

impl From<&PipelineError> for ReportedError {
    fn from(error: &PipelineError) -> Self {
        Self {
            code: error.error_code(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub graph: DependencyGraph,
    pub interfaces: Vec<InterfaceDescriptor>,
    pub patterns: Vec<Pattern>,
    pub anti_patterns: Vec<AntiPattern>,
    pub recommendations: Vec<Recommendation>,
    pub language_distribution: BTreeMap<Language, usize>,
    pub cross_language_edge_count: usize,
    pub stats: RunStats,
    pub errors: Vec<ReportedError>,
}

impl AnalysisReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_bucket_results_by_stage() {
        let mut stats = RunStats::default();
        stats.record_result(&ParseResult::from_primary("a.py", Language::Python, 0, Default::default()));
        stats.record_result(&ParseResult::empty("b.py", Language::Python, 0, None));
        assert_eq!((stats.files_analyzed, stats.primary, stats.empty), (2, 1, 1));
    }

    #[test]
    fn reported_errors_carry_codes() {
        let reported = ReportedError::from(&PipelineError::Cancelled);
        assert_eq!(reported.code, "CANCELLED");
    }
}
