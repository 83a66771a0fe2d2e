//! Recovery and degradation through the public parsing API.

use std::path::Path;
use std::sync::Arc;

use proptest::prelude::*;

use polyglot_analysis::parsers::{LanguageParser, ParseOrchestrator, ParsedSource, ParserRegistry};
use polyglot_analysis::recovery::strategies::{bracket_fix, quote_fix};
use polyglot_analysis::recovery::{classify, ErrorCategory, RecoveredOutput};
use polyglot_analysis::scanner::Language;
use polyglot_core::errors::ParseError;

struct RejectingParser(&'static str);

impl LanguageParser for RejectingParser {
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

fn count(text: &str, c: char) -> usize {
    text.chars().filter(|&x| x == c).count()
}

fn repaired(text: &str) -> String {
    match bracket_fix(text).expect("unbalanced input is repaired").output {
        RecoveredOutput::Content(content) => content,
        RecoveredOutput::Structure(_) => panic!("bracket fix produces content"),
    }
}

#[test]
fn stray_closing_brace_recovers() {
    let orchestrator = ParseOrchestrator::new(ParserRegistry::with_defaults());
    let content = b"export function load() {\n  return 1;\n}\n}\n";
    let result = orchestrator.parse_with_parser(
        "src/load.js",
        content,
        Language::JavaScript,
        Some(Arc::new(RejectingParser("Unexpected token }"))),
    );
    assert!(result.success);
    assert!(result.from_fallback);
    assert_eq!(result.strategy, "bracket_fix");
    let recovery = result.recovery.unwrap();
    assert_eq!(recovery.category, "bracket_mismatch");
    let fixed = recovery.fixed_content.unwrap();
    assert_eq!(count(&fixed, '{'), count(&fixed, '}'));
}

#[test]
fn empty_file_yields_empty_result() {
    let orchestrator = ParseOrchestrator::new(ParserRegistry::with_defaults());
    let result = orchestrator.parse_with_parser(
        "src/empty.js",
        b"",
        Language::JavaScript,
        Some(Arc::new(RejectingParser("Unexpected end of input"))),
    );
    assert!(result.success);
    assert_eq!(result.strategy, "empty");
    assert!(result.functions.is_empty());
    assert!(result.imports.is_empty());
    assert_eq!(result.complexity, 1);
}

#[test]
fn classifier_ignores_path_words() {
    assert_eq!(classify("syntax error: Unexpected token }", b""), ErrorCategory::BracketMismatch);
}

fn quote_repaired(text: &str) -> String {
    match quote_fix(text).expect("unmatched quote is repaired").output {
        RecoveredOutput::Content(content) => content,
        RecoveredOutput::Structure(_) => panic!("quote fix produces content"),
    }
}

fn quoted_lines() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(
        prop::sample::select(vec![
            "x = \"it's\"",
            "y = 'say \"hi\"'",
            "z = \"abc\";",
            "w = 'q'",
            "call(\"a, b\")",
            "s = \"esc \\\" q\"",
            "n = 1",
            "",
        ]),
        0..12,
    )
}

fn balanced() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["a", "()", "[]", "{}", "(b)", "{c}", "[d]", "f(x) { y[0] }", " "]),
        0..20,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn excess_closers_are_removed(body in balanced(), extra in 1usize..5) {
        let input = format!("{body}{}", "}".repeat(extra));
        let fixed = repaired(&input);
        prop_assert_eq!(count(&input, '}') - count(&fixed, '}'), extra);
        prop_assert_eq!(count(&fixed, '{'), count(&fixed, '}'));
        for c in ['(', ')', '[', ']'] {
            prop_assert_eq!(count(&fixed, c), count(&input, c));
        }
    }

    #[test]
    fn missing_closers_are_appended(body in balanced(), missing in 1usize..5) {
        let input = format!("{}{body}", "{".repeat(missing));
        let fixed = repaired(&input);
        prop_assert_eq!(count(&fixed, '}') - count(&input, '}'), missing);
        prop_assert_eq!(count(&fixed, '{'), count(&input, '{'));
        for c in ['(', ')', '[', ']'] {
            prop_assert_eq!(count(&fixed, c), count(&input, c));
        }
    }

    #[test]
    fn matched_quotes_are_left_alone(lines in quoted_lines()) {
        let input = lines.join("\n");
        prop_assert!(quote_fix(&input).is_none());
    }

    #[test]
    fn one_unclosed_quote_gains_exactly_one(
        lines in quoted_lines(),
        at in any::<prop::sample::Index>(),
        unclosed in prop::sample::select(vec![("u = \"it's", '"'), ("v = 'say \"x", '\''), ("f(\"a);", '"')]),
    ) {
        let (line, quote) = unclosed;
        let mut lines = lines;
        lines.insert(at.index(lines.len() + 1), line);
        let input = format!("{}\n", lines.join("\n"));
        let fixed = quote_repaired(&input);
        prop_assert_eq!(count(&fixed, quote), count(&input, quote) + 1);
        let other = if quote == '"' { '\'' } else { '"' };
        prop_assert_eq!(count(&fixed, other), count(&input, other));
    }
}
