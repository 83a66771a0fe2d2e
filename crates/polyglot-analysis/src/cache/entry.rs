//! Persisted cache entry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::parsers::types::ParseResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub file_path: String,
    pub project_root: String,
    pub branch: String,
    pub commit: Option<String>,
    /// Unix milliseconds.
    pub created_at_ms: u64,
    /// Unix milliseconds, refreshed on every hit.
    pub last_accessed_ms: u64,
    pub result: ParseResult,
}

impl CacheEntry {
    /// Entries strictly older than `max_age` are expired.
    pub fn is_expired(&self, now_ms: u64, max_age: Duration) -> bool {
        let max_age_ms = u64::try_from(max_age.as_millis()).unwrap_or(u64::MAX);
        now_ms.saturating_sub(self.created_at_ms) > max_age_ms
    }
}

/// Current wall-clock time in Unix milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
