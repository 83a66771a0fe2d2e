//! Tree-sitter primary parsers and the shared parse routine.

pub mod kinds;

use std::path::Path;

use polyglot_core::errors::ParseError;
use tree_sitter::Parser;

use super::error_tolerant::first_problem;
use super::extract::extract;
use super::types::ParsedSource;
use crate::define_parser;
use crate::scanner::language_detect::Language;

define_parser!(
    TypeScriptParser,
    Language::TypeScript,
    &["ts", "tsx", "mts", "cts"],
    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
);
define_parser!(
    JavaScriptParser,
    Language::JavaScript,
    &["js", "jsx", "mjs", "cjs"],
    tree_sitter_javascript::LANGUAGE.into()
);
define_parser!(PythonParser, Language::Python, &["py", "pyi"], tree_sitter_python::LANGUAGE.into());
define_parser!(GoParser, Language::Go, &["go"], tree_sitter_go::LANGUAGE.into());
define_parser!(RustParser, Language::Rust, &["rs"], tree_sitter_rust::LANGUAGE.into());
define_parser!(JavaParser, Language::Java, &["java"], tree_sitter_java::LANGUAGE.into());

/// Parse `source` with a tree-sitter grammar and extract structure.
///
/// Invalid UTF-8 is reported as an encoding error before parsing. A tree
/// containing ERROR or MISSING nodes is reported as a syntax error carrying
/// the first problem, so the orchestrator can classify it.
pub fn parse_with_language(
    source: &[u8],
    path: &Path,
    language: Language,
    ts_language: tree_sitter::Language,
) -> Result<ParsedSource, ParseError> {
    if let Err(e) = std::str::from_utf8(source) {
        return Err(ParseError::Encoding {
            path: path.to_path_buf(),
            message: format!("invalid UTF-8 byte sequence at offset {}", e.valid_up_to()),
        });
    }

    let kinds = kinds::node_kinds(language).ok_or_else(|| ParseError::GrammarNotFound {
        language: language.name().to_string(),
    })?;

    let mut parser = Parser::new();
    parser
        .set_language(&ts_language)
        .map_err(|e| ParseError::GrammarNotFound {
            language: format!("{}: {e}", language.name()),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError::Resource {
        path: path.to_path_buf(),
        message: "parser produced no tree".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let message = first_problem(root, source)
            .map(|p| p.message)
            .unwrap_or_else(|| "syntax error".to_string());
        return Err(ParseError::Syntax {
            path: path.to_path_buf(),
            message,
        });
    }

    Ok(extract(root, source, language, kinds))
}
