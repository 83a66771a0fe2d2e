//! Language detection from file extension.

use serde::{Deserialize, Serialize};

/// Languages the pipeline recognizes.
///
/// Only some of them have a primary tree-sitter parser; the rest are
/// handled by classification + fallback extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Go,
    Rust,
    Java,
    Kotlin,
    Ruby,
    Php,
    CSharp,
}

impl Language {
    /// Detect language from a file extension string.
    pub fn from_extension(ext: Option<&str>) -> Option<Language> {
        match ext?.to_ascii_lowercase().as_str() {
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "py" | "pyi" => Some(Language::Python),
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            "java" => Some(Language::Java),
            "kt" | "kts" => Some(Language::Kotlin),
            "rb" | "rake" | "gemspec" => Some(Language::Ruby),
            "php" => Some(Language::Php),
            "cs" => Some(Language::CSharp),
            _ => None,
        }
    }

    /// Resolve a language from its identifier or display name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Language> {
        Self::all()
            .iter()
            .copied()
            .find(|l| l.id().eq_ignore_ascii_case(name) || l.name().eq_ignore_ascii_case(name))
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::TypeScript,
            Language::JavaScript,
            Language::Python,
            Language::Go,
            Language::Rust,
            Language::Java,
            Language::Kotlin,
            Language::Ruby,
            Language::Php,
            Language::CSharp,
        ]
    }

    /// Returns all file extensions associated with this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::TypeScript => &["ts", "tsx", "mts", "cts"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::Python => &["py", "pyi"],
            Language::Go => &["go"],
            Language::Rust => &["rs"],
            Language::Java => &["java"],
            Language::Kotlin => &["kt", "kts"],
            Language::Ruby => &["rb", "rake", "gemspec"],
            Language::Php => &["php"],
            Language::CSharp => &["cs"],
        }
    }

    /// Stable lowercase identifier, used in config and cache keys.
    pub fn id(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::CSharp => "csharp",
        }
    }

    /// Returns the display name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Java => "Java",
            Language::Kotlin => "Kotlin",
            Language::Ruby => "Ruby",
            Language::Php => "PHP",
            Language::CSharp => "C#",
        }
    }

    /// Tree-sitter grammar for languages that have a primary parser.
    pub fn ts_language(&self) -> Option<tree_sitter::Language> {
        match self {
            Language::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            Language::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
            Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
            Language::Go => Some(tree_sitter_go::LANGUAGE.into()),
            Language::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
            Language::Java => Some(tree_sitter_java::LANGUAGE.into()),
            Language::Kotlin | Language::Ruby | Language::Php | Language::CSharp => None,
        }
    }

    /// Tree-sitter grammar with TSX handling for `.tsx` files.
    pub fn ts_language_for_ext(&self, ext: Option<&str>) -> Option<tree_sitter::Language> {
        if matches!(self, Language::TypeScript) && ext == Some("tsx") {
            Some(tree_sitter_typescript::LANGUAGE_TSX.into())
        } else {
            self.ts_language()
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
