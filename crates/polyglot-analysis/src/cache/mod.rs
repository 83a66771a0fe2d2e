//! Analysis cache: scoped keys, pluggable stores, TTL and LRU.

pub mod analysis_cache;
pub mod entry;
pub mod key;
pub mod sqlite_store;
pub mod stats;
pub mod store;
pub mod vcs;

pub use analysis_cache::{AnalysisCache, DEFAULT_MAX_AGE};
pub use entry::CacheEntry;
pub use key::{cache_key, CacheScope, DEFAULT_BRANCH};
pub use sqlite_store::SqliteStore;
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use store::{CacheStore, FileStore, MemoryStore};
pub use vcs::VcsScope;
