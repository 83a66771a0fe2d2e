//! Pipeline errors and non-fatal error collection.

use super::error_code::{self, PolyglotErrorCode};
use super::{CacheError, ConfigError, ParseError, ScanError};

/// Errors that can occur during an analysis run.
/// Aggregates subsystem errors via `From` conversions.
///
/// Only `Scan` and `Config` are fatal; the other variants are collected
/// into a [`PipelineResult`] while the run continues.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("Analysis cancelled")]
    Cancelled,
}

impl PolyglotErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::Cache(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::FileRead { .. } => error_code::SCAN_ERROR,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some files fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the pipeline run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    /// Create a new pipeline result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
