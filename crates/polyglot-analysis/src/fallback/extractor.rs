//! Heuristic fallback parser: regex extraction, content statistics, and a
//! minimal structural guess, tried in order under a time budget.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use polyglot_core::types::collections::FxHashSet;
use serde_json::json;
use smallvec::SmallVec;

use super::hints::{FallbackStrategy, StrategyHints};
use super::patterns::{generic_patterns, patterns_for, LanguagePatterns, NON_FUNCTION_NAMES};
use crate::parsers::types::{ClassInfo, FunctionInfo, ImportInfo, ImportKind, ParseResult, ParsedSource};
use crate::scanner::language_detect::Language;

/// Default fallback budget.
pub const DEFAULT_FALLBACK_BUDGET: Duration = Duration::from_millis(100);

/// A successful fallback attempt.
#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    pub strategy: FallbackStrategy,
    pub parsed: ParsedSource,
    pub confidence: f64,
}

/// Regex/heuristic extractor used when the primary parser and recovery fail.
#[derive(Debug, Clone)]
pub struct FallbackParser {
    budget: Duration,
    hints: StrategyHints,
}

impl Default for FallbackParser {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_BUDGET)
    }
}

impl FallbackParser {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            hints: StrategyHints::default(),
        }
    }

    pub fn hints(&self) -> &StrategyHints {
        &self.hints
    }

    /// Extract a complete result; falls through to the empty result when
    /// every strategy fails.
    pub fn extract(&self, file: &str, content: &str, language: Language) -> ParseResult {
        let content_hash = crate::scanner::hasher::hash_content(content.as_bytes());
        match self.try_extract(content, language) {
            Some(outcome) => fallback_result(file, language, content_hash, outcome, None),
            None => ParseResult::empty(file, language, content_hash, None),
        }
    }

    /// Try each strategy in hint-adjusted order until one succeeds or the
    /// budget runs out.
    pub fn try_extract(&self, content: &str, language: Language) -> Option<FallbackOutcome> {
        let start = Instant::now();
        for strategy in self.hints.order(language, content.len()) {
            if start.elapsed() > self.budget {
                tracing::warn!(
                    language = language.id(),
                    budget_ms = self.budget.as_millis() as u64,
                    "fallback budget exhausted"
                );
                return None;
            }
            let attempt = catch_unwind(AssertUnwindSafe(|| run_strategy(strategy, content, language)));
            match attempt {
                Ok(Some(parsed)) => {
                    tracing::debug!(language = language.id(), strategy = strategy.name(), "fallback succeeded");
                    self.hints.remember(language, content.len(), strategy);
                    return Some(FallbackOutcome {
                        strategy,
                        parsed,
                        confidence: strategy.confidence(),
                    });
                }
                Ok(None) => {
                    tracing::debug!(language = language.id(), strategy = strategy.name(), "fallback strategy found nothing");
                }
                Err(_) => {
                    tracing::warn!(language = language.id(), strategy = strategy.name(), "fallback strategy panicked");
                }
            }
        }
        None
    }
}

/// Build a `ParseResult` from a fallback outcome.
pub fn fallback_result(
    file: &str,
    language: Language,
    content_hash: u64,
    outcome: FallbackOutcome,
    error: Option<String>,
) -> ParseResult {
    let parsed = outcome.parsed;
    ParseResult {
        file: file.to_string(),
        language,
        content_hash,
        success: true,
        ast: parsed.ast,
        functions: parsed.functions,
        classes: parsed.classes,
        imports: parsed.imports,
        complexity: parsed.complexity.max(1),
        error,
        from_fallback: true,
        strategy: outcome.strategy.name().to_string(),
        warning: Some(format!(
            "structure extracted heuristically ({})",
            outcome.strategy.name()
        )),
        confidence: outcome.confidence,
        recovery: None,
        parse_time_us: 0,
    }
}

fn run_strategy(strategy: FallbackStrategy, content: &str, language: Language) -> Option<ParsedSource> {
    match strategy {
        FallbackStrategy::RegexExtraction => {
            let parsed = regex_extract(content, language);
            let found = !(parsed.functions.is_empty() && parsed.classes.is_empty() && parsed.imports.is_empty());
            found.then_some(parsed)
        }
        FallbackStrategy::ContentStatistics => content_statistics(content, language),
        FallbackStrategy::MinimalStructure => minimal_structure(content),
    }
}

/// Regex extraction with the language family, falling back to the generic
/// family when the language patterns find no callables or types.
/// Complexity is `1 + functions + 2 × classes`.
pub fn regex_extract(content: &str, language: Language) -> ParsedSource {
    let line_starts = line_starts(content);
    let mut parsed = extract_with(content, language, patterns_for(language), &line_starts);
    if parsed.functions.is_empty() && parsed.classes.is_empty() {
        let generic = extract_with(content, language, generic_patterns(), &line_starts);
        parsed.functions = generic.functions;
        parsed.classes = generic.classes;
        if parsed.imports.is_empty() {
            parsed.imports = generic.imports;
        }
    }
    parsed.complexity = 1 + parsed.functions.len() as u32 + 2 * parsed.classes.len() as u32;
    parsed.ast = Some(json!({
        "kind": "heuristic",
        "functions": parsed.functions.len(),
        "classes": parsed.classes.len(),
        "imports": parsed.imports.len(),
    }));
    parsed
}

fn extract_with(
    content: &str,
    language: Language,
    patterns: &LanguagePatterns,
    line_starts: &[usize],
) -> ParsedSource {
    let mut seen: FxHashSet<(String, u32)> = FxHashSet::default();
    let mut functions = Vec::new();
    for re in &patterns.functions {
        for caps in re.captures_iter(content) {
            let Some(m) = caps.name("name") else { continue };
            let name = m.as_str();
            if NON_FUNCTION_NAMES.contains(&name) {
                continue;
            }
            let line = line_at(line_starts, m.start());
            if !seen.insert((name.to_string(), line)) {
                continue;
            }
            functions.push(FunctionInfo {
                name: name.to_string(),
                line,
                complexity: 1,
                is_exported: looks_exported(language, line_text(content, line_starts, m.start()), name),
            });
        }
    }

    let mut classes = Vec::new();
    for re in &patterns.classes {
        for caps in re.captures_iter(content) {
            let Some(m) = caps.name("name") else { continue };
            let name = m.as_str();
            let line = line_at(line_starts, m.start());
            if !seen.insert((name.to_string(), line)) {
                continue;
            }
            classes.push(ClassInfo {
                name: name.to_string(),
                methods: SmallVec::new(),
                line,
                is_exported: looks_exported(language, line_text(content, line_starts, m.start()), name),
            });
        }
    }

    let mut imports = Vec::new();
    let mut seen_imports: FxHashSet<(String, u32)> = FxHashSet::default();
    for re in &patterns.imports {
        for caps in re.captures_iter(content) {
            let Some(source) = caps.name("source") else { continue };
            let line = line_at(line_starts, source.start());
            if !seen_imports.insert((source.as_str().to_string(), line)) {
                continue;
            }
            let (kind, names) = match caps.name("names") {
                Some(raw) => parse_import_names(raw.as_str()),
                None => (ImportKind::Module, SmallVec::new()),
            };
            let raw_source = source.as_str();
            let (source, kind) = match raw_source
                .strip_suffix(".*")
                .or_else(|| raw_source.strip_suffix("::*"))
            {
                Some(prefix) => (prefix.to_string(), ImportKind::Wildcard),
                None => (raw_source.trim_end_matches("::").to_string(), kind),
            };
            imports.push(ImportInfo { source, kind, names, line });
        }
    }

    functions.sort_by_key(|f| f.line);
    classes.sort_by_key(|c| c.line);
    imports.sort_by_key(|i| i.line);

    ParsedSource {
        functions,
        classes,
        imports,
        complexity: 1,
        ast: None,
    }
}

fn parse_import_names(raw: &str) -> (ImportKind, SmallVec<[String; 4]>) {
    if raw.contains('*') {
        return (ImportKind::Wildcard, SmallVec::new());
    }
    let names: SmallVec<[String; 4]> = raw
        .split([',', '{', '}', '(', ')'])
        .filter_map(|part| part.split_whitespace().next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        (ImportKind::Module, names)
    } else {
        (ImportKind::Named, names)
    }
}

fn looks_exported(language: Language, line: &str, name: &str) -> bool {
    let trimmed = line.trim_start();
    match language {
        Language::Python | Language::Ruby => !name.starts_with('_'),
        Language::Go => name.chars().next().is_some_and(char::is_uppercase),
        Language::TypeScript | Language::JavaScript => trimmed.starts_with("export"),
        Language::Rust => trimmed.starts_with("pub"),
        Language::Java | Language::CSharp => trimmed.contains("public"),
        Language::Kotlin => !(trimmed.contains("private") || trimmed.contains("internal")),
        Language::Php => !(trimmed.contains("private") || trimmed.contains("protected")),
    }
}

const FUNCTION_KEYWORDS: &[&str] = &["def", "function", "func", "fn", "fun"];
const CLASS_KEYWORDS: &[&str] = &["class", "struct", "interface", "trait", "module", "object"];

/// Estimate structure from keyword frequencies when no names can be extracted.
fn content_statistics(content: &str, language: Language) -> Option<ParsedSource> {
    let mut estimated_functions = 0u32;
    let mut estimated_classes = 0u32;
    for token in content.split(|c: char| !c.is_alphanumeric() && c != '_') {
        if FUNCTION_KEYWORDS.contains(&token) {
            estimated_functions += 1;
        } else if CLASS_KEYWORDS.contains(&token) {
            estimated_classes += 1;
        }
    }
    if matches!(language, Language::TypeScript | Language::JavaScript) {
        estimated_functions += content.matches("=>").count() as u32;
    }
    if estimated_functions + estimated_classes == 0 {
        return None;
    }

    let lines = content.lines().count();
    let non_blank = content.lines().filter(|l| !l.trim().is_empty()).count();
    let comment_lines = content
        .lines()
        .map(str::trim_start)
        .filter(|l| l.starts_with("//") || l.starts_with('#') || l.starts_with("/*") || l.starts_with('*'))
        .count();

    Some(ParsedSource {
        functions: Vec::new(),
        classes: Vec::new(),
        imports: Vec::new(),
        complexity: 1 + estimated_functions + 2 * estimated_classes,
        ast: Some(json!({
            "kind": "statistics",
            "lines": lines,
            "non_blank_lines": non_blank,
            "comment_lines": comment_lines,
            "estimated_functions": estimated_functions,
            "estimated_classes": estimated_classes,
        })),
    })
}

/// Last resort: a single module node, as long as there is any content.
fn minimal_structure(content: &str) -> Option<ParsedSource> {
    if content.trim().is_empty() {
        return None;
    }
    let top_level = content
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with([' ', '\t']))
        .count();
    Some(ParsedSource {
        complexity: 1,
        ast: Some(json!({
            "kind": "module",
            "lines": content.lines().count(),
            "top_level_statements": top_level,
        })),
        ..ParsedSource::default()
    })
}

fn line_starts(content: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(content.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// 1-based line containing byte `offset`.
fn line_at(line_starts: &[usize], offset: usize) -> u32 {
    line_starts.partition_point(|&s| s <= offset) as u32
}

fn line_text<'a>(content: &'a str, line_starts: &[usize], offset: usize) -> &'a str {
    let idx = line_starts.partition_point(|&s| s <= offset).saturating_sub(1);
    let start = line_starts[idx];
    let end = line_starts.get(idx + 1).map_or(content.len(), |&e| e.saturating_sub(1));
    &content[start..end.max(start)]
}
