//! Analysis cache errors.
//!
//! The cache swallows these and counts them; they only surface through
//! the `CacheStore` trait and in logs.

use super::error_code::{self, PolyglotErrorCode};

/// Errors raised by a cache backing store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache I/O error for {key}: {message}")]
    Io { key: String, message: String },

    #[error("Cache entry {key} could not be (de)serialized: {message}")]
    Serialization { key: String, message: String },

    #[error("Cache database error: {message}")]
    Database { message: String },

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

impl PolyglotErrorCode for CacheError {
    fn error_code(&self) -> &'static str {
        error_code::CACHE_ERROR
    }
}
