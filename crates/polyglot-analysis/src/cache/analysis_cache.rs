//! Branch-aware analysis cache with TTL expiry and LRU capacity enforcement.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use polyglot_core::config::CacheConfig;
use polyglot_core::errors::{CacheError, ConfigError};
use polyglot_core::events::types::CacheLookupEvent;
use polyglot_core::events::EventDispatcher;

use super::entry::{now_ms, CacheEntry};
use super::key::{cache_key, normalize_root, CacheScope};
use super::stats::{CacheStats, CacheStatsSnapshot};
use super::store::{CacheStore, FileStore, MemoryStore};
use crate::parsers::types::ParseResult;

/// Two hours, matching the configuration default.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(2 * 60 * 60);

/// Caches parse results keyed by file, scope and content.
///
/// Store failures never surface to callers: they are logged, counted in
/// [`CacheStats::errors`](CacheStatsSnapshot::errors), and treated as a miss.
/// Clones share the store and the counters.
#[derive(Clone)]
pub struct AnalysisCache {
    store: Option<Arc<dyn CacheStore>>,
    max_age: Duration,
    stats: CacheStats,
    events: EventDispatcher,
}

impl fmt::Debug for AnalysisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("enabled", &self.is_enabled())
            .field("max_age", &self.max_age)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

impl AnalysisCache {
    pub fn new(store: Arc<dyn CacheStore>, max_age: Duration) -> Self {
        Self {
            store: Some(store),
            max_age,
            stats: CacheStats::default(),
            events: EventDispatcher::default(),
        }
    }

    pub fn in_memory(max_age: Duration) -> Self {
        Self::new(Arc::new(MemoryStore::new()), max_age)
    }

    /// A cache that always misses and never stores.
    pub fn disabled() -> Self {
        Self {
            store: None,
            max_age: DEFAULT_MAX_AGE,
            stats: CacheStats::default(),
            events: EventDispatcher::default(),
        }
    }

    /// File-backed cache under the configured directory. An invalid
    /// max-age is a configuration error; an unusable directory disables
    /// the cache with a warning.
    pub fn from_config(config: &CacheConfig, project_root: &Path) -> Result<Self, ConfigError> {
        let max_age = config.effective_max_age()?;
        if !config.effective_enabled() {
            return Ok(Self::disabled());
        }
        let directory = config.effective_directory(project_root);
        match FileStore::open(&directory) {
            Ok(store) => Ok(Self::new(Arc::new(store), max_age)),
            Err(e) => {
                tracing::warn!(
                    directory = %directory.display(),
                    error = %e,
                    "cache directory unusable, caching disabled"
                );
                Ok(Self::disabled())
            }
        }
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Look up a result. Expired entries are deleted and reported as a miss.
    pub fn get(&self, file: &str, content: &[u8], scope: &CacheScope) -> Option<ParseResult> {
        let Some(store) = &self.store else {
            self.miss(file, scope);
            return None;
        };
        let key = cache_key(file, scope, content);
        let mut entry = match store.read(&key) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                self.miss(file, scope);
                return None;
            }
            Err(e) => {
                self.store_error("read", &e);
                self.miss(file, scope);
                return None;
            }
        };

        let now = now_ms();
        if entry.is_expired(now, self.max_age) {
            tracing::debug!(file, branch = %scope.branch, "cache entry expired");
            match store.delete(&key) {
                Ok(true) => self.stats.record_deletes(1),
                Ok(false) => {}
                Err(e) => self.store_error("delete", &e),
            }
            self.miss(file, scope);
            return None;
        }

        entry.last_accessed_ms = now;
        if let Err(e) = store.write(&entry) {
            self.store_error("touch", &e);
        }
        self.stats.record_hit();
        self.events.emit_cache_hit(&CacheLookupEvent {
            file: file.to_string(),
            branch: scope.branch.clone(),
        });
        Some(entry.result)
    }

    /// Store a result. Returns false when disabled or when the write fails.
    pub fn set(&self, file: &str, content: &[u8], scope: &CacheScope, result: &ParseResult) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        let now = now_ms();
        let entry = CacheEntry {
            key: cache_key(file, scope, content),
            file_path: file.to_string(),
            project_root: scope.root_str(),
            branch: scope.branch.clone(),
            commit: scope.commit.clone(),
            created_at_ms: now,
            last_accessed_ms: now,
            result: result.clone(),
        };
        match store.write(&entry) {
            Ok(()) => {
                self.stats.record_write();
                true
            }
            Err(e) => {
                self.store_error("write", &e);
                false
            }
        }
    }

    /// Remove every entry for `file` under `project_root`, on any branch.
    pub fn invalidate_file(&self, file: &str, project_root: &Path) -> usize {
        let root = normalize_root(project_root);
        self.delete_where(|entry| entry.file_path == file && entry.project_root == root)
    }

    /// Remove every entry recorded for `branch`.
    pub fn invalidate_branch(&self, branch: &str) -> usize {
        self.delete_where(|entry| entry.branch == branch)
    }

    /// Remove every entry.
    pub fn clear(&self) -> usize {
        let Some(store) = &self.store else { return 0 };
        let keys = match store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                self.store_error("keys", &e);
                return 0;
            }
        };
        self.delete_keys(store.as_ref(), keys.iter().map(String::as_str))
    }

    /// Evict least-recently-accessed entries until at most `max_entries` remain.
    pub fn enforce_capacity(&self, max_entries: usize) -> usize {
        let Some(store) = &self.store else { return 0 };
        let mut entries = self.entries(store.as_ref());
        if entries.len() <= max_entries {
            return 0;
        }
        entries.sort_by(|a, b| {
            a.last_accessed_ms
                .cmp(&b.last_accessed_ms)
                .then_with(|| a.key.cmp(&b.key))
        });
        let excess = entries.len() - max_entries;
        let evicted = self.delete_keys(
            store.as_ref(),
            entries[..excess].iter().map(|e| e.key.as_str()),
        );
        tracing::debug!(evicted, max_entries, "cache capacity enforced");
        evicted
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Log the current hit rate.
    pub fn log_stats(&self) {
        let snapshot = self.stats.snapshot();
        tracing::info!(
            cache_hit_rate = snapshot.hit_rate,
            hits = snapshot.hits,
            misses = snapshot.misses,
            errors = snapshot.errors,
            "analysis cache stats"
        );
    }

    fn miss(&self, file: &str, scope: &CacheScope) {
        self.stats.record_miss();
        self.events.emit_cache_miss(&CacheLookupEvent {
            file: file.to_string(),
            branch: scope.branch.clone(),
        });
    }

    fn store_error(&self, op: &str, error: &CacheError) {
        tracing::warn!(op, error = %error, "cache store failure treated as miss");
        self.stats.record_error();
    }

    /// Every readable entry; unreadable ones are counted and skipped.
    fn entries(&self, store: &dyn CacheStore) -> Vec<CacheEntry> {
        let keys = match store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                self.store_error("keys", &e);
                return Vec::new();
            }
        };
        keys.iter()
            .filter_map(|key| match store.read(key) {
                Ok(entry) => entry,
                Err(e) => {
                    self.store_error("read", &e);
                    None
                }
            })
            .collect()
    }

    fn delete_where(&self, predicate: impl Fn(&CacheEntry) -> bool) -> usize {
        let Some(store) = &self.store else { return 0 };
        let matching: Vec<String> = self
            .entries(store.as_ref())
            .into_iter()
            .filter(|entry| predicate(entry))
            .map(|entry| entry.key)
            .collect();
        self.delete_keys(store.as_ref(), matching.iter().map(String::as_str))
    }

    fn delete_keys<'a>(&self, store: &dyn CacheStore, keys: impl Iterator<Item = &'a str>) -> usize {
        let mut deleted = 0usize;
        for key in keys {
            match store.delete(key) {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => self.store_error("delete", &e),
            }
        }
        self.stats.record_deletes(deleted as u64);
        deleted
    }
}
