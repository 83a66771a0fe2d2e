//! LanguageParser trait: the contract every primary parser implements.

use std::path::Path;

use polyglot_core::errors::ParseError;

use super::types::ParsedSource;
use crate::scanner::language_detect::Language;

/// Trait that every primary language parser must implement.
///
/// A parser that cannot produce a clean tree returns an error; the
/// orchestrator classifies it and degrades gracefully.
pub trait LanguageParser: Send + Sync {
    /// The language this parser handles.
    fn language(&self) -> Language;

    /// File extensions this parser handles.
    fn extensions(&self) -> &[&str];

    /// Parse source code.
    fn parse(&self, source: &[u8], path: &Path) -> Result<ParsedSource, ParseError>;
}
