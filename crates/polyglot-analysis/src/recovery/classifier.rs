//! Error classification by keyword matching on the parser message, refined
//! with content evidence for generic syntax errors.

use serde::{Deserialize, Serialize};

/// Fixed set of parse failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    BracketMismatch,
    QuoteMismatch,
    MissingSemicolon,
    EncodingError,
    ResourceError,
    TimeoutError,
    ParseError,
    UnknownError,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BracketMismatch => "bracket_mismatch",
            Self::QuoteMismatch => "quote_mismatch",
            Self::MissingSemicolon => "missing_semicolon",
            Self::EncodingError => "encoding_error",
            Self::ResourceError => "resource_error",
            Self::TimeoutError => "timeout_error",
            Self::ParseError => "parse_error",
            Self::UnknownError => "unknown_error",
        }
    }

    pub fn all() -> &'static [ErrorCategory] {
        &[
            Self::BracketMismatch,
            Self::QuoteMismatch,
            Self::MissingSemicolon,
            Self::EncodingError,
            Self::ResourceError,
            Self::TimeoutError,
            Self::ParseError,
            Self::UnknownError,
        ]
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const ENCODING_KEYWORDS: &[&str] = &["encoding", "utf-8", "utf8", "unicode", "decode", "invalid byte", "charset"];
const TIMEOUT_KEYWORDS: &[&str] = &["timeout", "timed out", "deadline"];
const RESOURCE_KEYWORDS: &[&str] = &[
    "memory",
    "resource",
    "stack overflow",
    "too large",
    "limit exceeded",
    "allocation",
];
const SYNTAX_KEYWORDS: &[&str] = &[
    "syntax",
    "unexpected",
    "expected",
    "unterminated",
    "unclosed",
    "unmatched",
    "missing",
    "token",
];
const PARSE_KEYWORDS: &[&str] = &["parse", "parser", "grammar", "panicked"];

const QUOTE_KEYWORDS: &[&str] = &["quote", "string literal", "unterminated string", "\"", "'", "`"];
const BRACKET_KEYWORDS: &[&str] = &[
    "bracket",
    "brace",
    "paren",
    "{",
    "}",
    "(",
    ")",
    "[",
    "]",
    "end of input",
    "end of file",
    "eof",
];
const SEMICOLON_KEYWORDS: &[&str] = &["semicolon", ";"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Classify a parser failure.
///
/// Top-level order: encoding, timeout, resource, syntax, generic parse.
/// Syntax errors are sub-classified (quote, then bracket/paren, then
/// semicolon); a syntax message naming none of those is refined with
/// evidence from `content` before settling on `ParseError`.
pub fn classify(message: &str, content: &[u8]) -> ErrorCategory {
    let lower = message.to_lowercase();

    if contains_any(&lower, ENCODING_KEYWORDS) {
        return ErrorCategory::EncodingError;
    }
    if contains_any(&lower, TIMEOUT_KEYWORDS) {
        return ErrorCategory::TimeoutError;
    }
    if contains_any(&lower, RESOURCE_KEYWORDS) {
        return ErrorCategory::ResourceError;
    }
    if contains_any(&lower, SYNTAX_KEYWORDS) {
        return classify_syntax(&lower, content);
    }
    if contains_any(&lower, PARSE_KEYWORDS) {
        return ErrorCategory::ParseError;
    }
    ErrorCategory::UnknownError
}

fn classify_syntax(lower: &str, content: &[u8]) -> ErrorCategory {
    if contains_any(lower, QUOTE_KEYWORDS) {
        return ErrorCategory::QuoteMismatch;
    }
    if contains_any(lower, BRACKET_KEYWORDS) {
        return ErrorCategory::BracketMismatch;
    }
    if contains_any(lower, SEMICOLON_KEYWORDS) {
        return ErrorCategory::MissingSemicolon;
    }

    let text = String::from_utf8_lossy(content);
    if has_unbalanced_brackets(&text) {
        ErrorCategory::BracketMismatch
    } else if has_odd_quotes(&text) {
        ErrorCategory::QuoteMismatch
    } else {
        ErrorCategory::ParseError
    }
}

/// Naive character counts; string contents and comments are not excluded.
pub fn has_unbalanced_brackets(text: &str) -> bool {
    [('{', '}'), ('(', ')'), ('[', ']')]
        .iter()
        .any(|&(open, close)| count_char(text, open) != count_char(text, close))
}

pub fn has_odd_quotes(text: &str) -> bool {
    count_char(text, '"') % 2 == 1 || count_char(text, '\'') % 2 == 1
}

pub(crate) fn count_char(text: &str, c: char) -> usize {
    text.chars().filter(|&ch| ch == c).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_brace_is_bracket_mismatch() {
        assert_eq!(classify("Unexpected token }", b""), ErrorCategory::BracketMismatch);
    }

    #[test]
    fn top_level_categories() {
        assert_eq!(
            classify("invalid UTF-8 byte sequence at offset 3", b""),
            ErrorCategory::EncodingError
        );
        assert_eq!(classify("Parse timeout after 5000ms", b""), ErrorCategory::TimeoutError);
        assert_eq!(classify("out of memory", b""), ErrorCategory::ResourceError);
        assert_eq!(classify("parser panicked", b""), ErrorCategory::ParseError);
        assert_eq!(classify("something odd", b""), ErrorCategory::UnknownError);
    }

    #[test]
    fn syntax_sub_classification() {
        assert_eq!(
            classify("SyntaxError: unterminated string literal", b""),
            ErrorCategory::QuoteMismatch
        );
        assert_eq!(classify("Missing ; at line 4", b""), ErrorCategory::MissingSemicolon);
        assert_eq!(classify("Expected ) at line 2", b""), ErrorCategory::BracketMismatch);
    }

    #[test]
    fn generic_syntax_uses_content_evidence() {
        assert_eq!(
            classify("invalid syntax", b"def f(:\n    pass\n"),
            ErrorCategory::BracketMismatch
        );
        assert_eq!(classify("invalid syntax", b"x = \"abc\n"), ErrorCategory::QuoteMismatch);
        assert_eq!(classify("invalid syntax", b"x = 1\n"), ErrorCategory::ParseError);
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        assert_eq!(classify("TIMED OUT", b""), ErrorCategory::TimeoutError);
    }
}
