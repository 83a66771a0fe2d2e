//! Cache counters, shared by every clone of a cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
    errors: AtomicU64,
}

/// Thread-safe counters. Cloning shares the underlying counters.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    inner: Arc<Counters>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub deletes: u64,
    pub errors: u64,
    /// hits / (hits + misses), 0 when there were no lookups.
    pub hit_rate: f64,
}

impl CacheStats {
    pub fn record_hit(&self) {
        self.inner.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.inner.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.inner.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deletes(&self, n: u64) {
        self.inner.deletes.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.inner.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.inner.hits.load(Ordering::Relaxed);
        let misses = self.inner.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        CacheStatsSnapshot {
            hits,
            misses,
            writes: self.inner.writes.load(Ordering::Relaxed),
            deletes: self.inner.deletes.load(Ordering::Relaxed),
            errors: self.inner.errors.load(Ordering::Relaxed),
            hit_rate: if lookups == 0 { 0.0 } else { hits as f64 / lookups as f64 },
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.inner.hits,
            &self.inner.misses,
            &self.inner.writes,
            &self.inner.deletes,
            &self.inner.errors,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
