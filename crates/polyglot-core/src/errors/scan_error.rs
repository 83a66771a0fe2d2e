//! File discovery errors.

use std::path::PathBuf;

use super::error_code::{self, PolyglotErrorCode};

/// Errors that can occur while discovering project files.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Project root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Project root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("I/O error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid exclude pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl PolyglotErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        error_code::SCAN_ERROR
    }
}
