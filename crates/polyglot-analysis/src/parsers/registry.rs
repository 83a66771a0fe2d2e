//! ParserRegistry: language → primary parser lookup.

use std::sync::Arc;

use polyglot_core::types::collections::FxHashMap;

use super::languages::{GoParser, JavaParser, JavaScriptParser, PythonParser, RustParser, TypeScriptParser};
use super::traits::LanguageParser;
use crate::scanner::language_detect::Language;

/// Pluggable mapping from language to primary parser.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: FxHashMap<Language, Arc<dyn LanguageParser>>,
}

impl ParserRegistry {
    /// An empty registry: every language goes straight to fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in tree-sitter parsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TypeScriptParser::new()));
        registry.register(Arc::new(JavaScriptParser::new()));
        registry.register(Arc::new(PythonParser::new()));
        registry.register(Arc::new(GoParser::new()));
        registry.register(Arc::new(RustParser::new()));
        registry.register(Arc::new(JavaParser::new()));
        registry
    }

    /// Register (or replace) the parser for its language.
    pub fn register(&mut self, parser: Arc<dyn LanguageParser>) {
        self.parsers.insert(parser.language(), parser);
    }

    pub fn get(&self, language: Language) -> Option<Arc<dyn LanguageParser>> {
        self.parsers.get(&language).cloned()
    }

    pub fn supports(&self, language: Language) -> bool {
        self.parsers.contains_key(&language)
    }

    /// Registered languages in stable order.
    pub fn languages(&self) -> Vec<Language> {
        let mut langs: Vec<Language> = self.parsers.keys().copied().collect();
        langs.sort();
        langs
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("languages", &self.languages())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_tree_sitter_languages() {
        let registry = ParserRegistry::with_defaults();
        for lang in [
            Language::TypeScript,
            Language::JavaScript,
            Language::Python,
            Language::Go,
            Language::Rust,
            Language::Java,
        ] {
            assert!(registry.supports(lang), "missing parser for {lang}");
        }
        assert!(registry.get(Language::Kotlin).is_none());
        assert!(registry.get(Language::Ruby).is_none());
    }

    #[test]
    fn empty_registry_has_no_parsers() {
        assert!(ParserRegistry::new().languages().is_empty());
    }
}
