//! Manual fix suggestions reported when every strategy for a category fails.

use super::classifier::ErrorCategory;

pub fn manual_suggestions(category: ErrorCategory) -> &'static [&'static str] {
    match category {
        ErrorCategory::BracketMismatch => &[
            "Check that every opening brace, parenthesis and bracket has a matching closer",
            "Look for a stray closing brace near the reported line",
        ],
        ErrorCategory::QuoteMismatch => &[
            "Close the unterminated string literal",
            "Escape quotes that appear inside string literals",
        ],
        ErrorCategory::MissingSemicolon => &[
            "Terminate the statement before the reported line with a semicolon",
        ],
        ErrorCategory::EncodingError => &[
            "Re-save the file as UTF-8",
            "Remove binary or control characters from the file",
        ],
        ErrorCategory::ResourceError => &[
            "Split the file into smaller modules",
            "Exclude generated or vendored files from analysis",
        ],
        ErrorCategory::TimeoutError => &[
            "Split the file into smaller modules",
            "Raise parser.primary_timeout_ms for very large sources",
        ],
        ErrorCategory::ParseError => &[
            "Check the file with the language's own compiler or linter",
            "Verify the file extension matches its language",
        ],
        ErrorCategory::UnknownError => &["Inspect the parser error message for details"],
    }
}
