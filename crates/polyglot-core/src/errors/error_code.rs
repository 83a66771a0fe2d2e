//! PolyglotErrorCode trait for stable, machine-readable error codes.

/// Trait for mapping polyglot errors to stable error code strings.
/// Every error enum implements this so embedders can match on a code
/// instead of parsing messages.
pub trait PolyglotErrorCode {
    /// Returns the error code string (e.g., "PARSE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const PARSE_TIMEOUT: &str = "PARSE_TIMEOUT";
pub const UNSUPPORTED_LANGUAGE: &str = "UNSUPPORTED_LANGUAGE";
pub const CACHE_ERROR: &str = "CACHE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CANCELLED: &str = "CANCELLED";
