//! Primary parser errors.
//!
//! These never cross the orchestrator boundary: they are classified and
//! turned into degraded results. Their `Display` text is what the error
//! classifier inspects, so messages keep the parser's own wording.

use std::path::PathBuf;

use super::error_code::{self, PolyglotErrorCode};

/// Errors a primary language parser can report.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Grammar not found for language: {language}")]
    GrammarNotFound { language: String },

    #[error("Syntax error in {path}: {message}")]
    Syntax { path: PathBuf, message: String },

    #[error("Parse timeout for {path} after {timeout_ms}ms")]
    Timeout { path: PathBuf, timeout_ms: u64 },

    #[error("No parser registered for language: {language}")]
    UnsupportedLanguage { language: String },

    #[error("Invalid encoding in {path}: {message}")]
    Encoding { path: PathBuf, message: String },

    #[error("Resource limit exceeded parsing {path}: {message}")]
    Resource { path: PathBuf, message: String },

    #[error("Parser panicked on {path}")]
    Panicked { path: PathBuf },
}

impl PolyglotErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage { .. } => error_code::UNSUPPORTED_LANGUAGE,
            Self::Timeout { .. } => error_code::PARSE_TIMEOUT,
            _ => error_code::PARSE_ERROR,
        }
    }
}
