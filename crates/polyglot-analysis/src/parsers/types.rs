//! Canonical parse output shared by the primary parsers, the recovery
//! engine, the fallback extractor, and the cache.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::scanner::language_detect::Language;

/// Strategy tag for a result produced by the primary parser.
pub const STRATEGY_PRIMARY: &str = "primary";
/// Strategy tag for the empty-but-valid terminal result.
pub const STRATEGY_EMPTY: &str = "empty";

/// A function or method discovered in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    /// 1-based start line.
    pub line: u32,
    pub complexity: u32,
    pub is_exported: bool,
}

/// A class-like declaration (class, struct, interface, trait, enum).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub methods: SmallVec<[String; 8]>,
    pub line: u32,
    pub is_exported: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// Whole-module import (`import os`, `require("x")`, Go imports).
    Module,
    /// Named imports (`from x import a, b`, `import { a } from "x"`).
    Named,
    /// Glob import (`from x import *`, `use x::*`).
    Wildcard,
    /// Import for side effects only (`import "./polyfill"`).
    SideEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub source: String,
    pub kind: ImportKind,
    pub names: SmallVec<[String; 4]>,
    pub line: u32,
}

/// What a [`LanguageParser`](super::traits::LanguageParser) hands back on success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSource {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub imports: Vec<ImportInfo>,
    /// File-level cyclomatic estimate: 1 + decision points.
    pub complexity: u32,
    /// Opaque per-language summary of the syntax tree.
    pub ast: Option<serde_json::Value>,
}

/// Recovery metadata attached when a repair strategy produced the result.
///
/// `fixed_content` is advisory: it has not been re-validated by a parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryInfo {
    pub category: String,
    pub strategy: String,
    pub changes: Vec<String>,
    pub confidence: f64,
    pub fixed_content: Option<String>,
}

/// Result of orchestrated parsing. Always produced, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub file: String,
    pub language: Language,
    pub content_hash: u64,
    pub success: bool,
    pub ast: Option<serde_json::Value>,
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub imports: Vec<ImportInfo>,
    pub complexity: u32,
    /// Original primary-parser error, kept through every degraded path.
    pub error: Option<String>,
    pub from_fallback: bool,
    pub strategy: String,
    pub warning: Option<String>,
    pub confidence: f64,
    pub recovery: Option<RecoveryInfo>,
    pub parse_time_us: u64,
}

impl ParseResult {
    /// Wrap a primary parser's output.
    pub fn from_primary(file: &str, language: Language, content_hash: u64, parsed: ParsedSource) -> Self {
        Self {
            file: file.to_string(),
            language,
            content_hash,
            success: true,
            ast: parsed.ast,
            functions: parsed.functions,
            classes: parsed.classes,
            imports: parsed.imports,
            complexity: parsed.complexity.max(1),
            error: None,
            from_fallback: false,
            strategy: STRATEGY_PRIMARY.to_string(),
            warning: None,
            confidence: 1.0,
            recovery: None,
            parse_time_us: 0,
        }
    }

    /// Terminal result used when every strategy failed.
    pub fn empty(file: &str, language: Language, content_hash: u64, error: Option<String>) -> Self {
        Self {
            file: file.to_string(),
            language,
            content_hash,
            success: true,
            ast: None,
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            complexity: 1,
            error,
            from_fallback: true,
            strategy: STRATEGY_EMPTY.to_string(),
            warning: Some("all parsing strategies failed; returning empty structure".to_string()),
            confidence: 0.0,
            recovery: None,
            parse_time_us: 0,
        }
    }

    /// Whether the result came from a degraded path.
    pub fn is_degraded(&self) -> bool {
        self.strategy != STRATEGY_PRIMARY
    }

    /// Export names visible to other files: exported functions and classes.
    pub fn exported_names(&self) -> impl Iterator<Item = &str> {
        self.functions
            .iter()
            .filter(|f| f.is_exported)
            .map(|f| f.name.as_str())
            .chain(self.classes.iter().filter(|c| c.is_exported).map(|c| c.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_shape() {
        let r = ParseResult::empty("a.py", Language::Python, 0, Some("boom".into()));
        assert!(r.success);
        assert_eq!(r.strategy, STRATEGY_EMPTY);
        assert_eq!(r.complexity, 1);
        assert!(r.functions.is_empty() && r.classes.is_empty() && r.imports.is_empty());
        assert_eq!(r.error.as_deref(), Some("boom"));
        assert!(r.warning.is_some());
        assert!(r.is_degraded());
    }

    #[test]
    fn primary_result_has_full_confidence() {
        let r = ParseResult::from_primary("a.py", Language::Python, 7, ParsedSource::default());
        assert_eq!(r.strategy, STRATEGY_PRIMARY);
        assert_eq!(r.confidence, 1.0);
        assert_eq!(r.complexity, 1);
        assert!(!r.from_fallback);
        assert!(!r.is_degraded());
    }

    #[test]
    fn result_survives_json() {
        let mut r = ParseResult::from_primary("a.ts", Language::TypeScript, 42, ParsedSource::default());
        r.imports.push(ImportInfo {
            source: "./b".into(),
            kind: ImportKind::Named,
            names: smallvec::smallvec!["x".to_string()],
            line: 1,
        });
        let json = serde_json::to_string(&r).unwrap();
        let back: ParseResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
