//! SQLite-backed cache store: one row per key in a single database file.

use std::path::Path;
use std::sync::Mutex;

use polyglot_core::errors::CacheError;
use rusqlite::{params, Connection, OptionalExtension};

use super::entry::{now_ms, CacheEntry};
use super::store::CacheStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cache_entries (
    key         TEXT PRIMARY KEY,
    payload     TEXT NOT NULL,
    modified_ms INTEGER NOT NULL
);
";

/// Single-connection SQLite store. Each write is one `INSERT OR REPLACE`,
/// which SQLite applies atomically.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

fn db_error(e: rusqlite::Error) -> CacheError {
    CacheError::Database {
        message: e.to_string(),
    }
}

impl SqliteStore {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(db_error)?;
        conn.pragma_update(None, "journal_mode", "WAL").map_err(db_error)?;
        Self::initialize(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, CacheError> {
        Self::initialize(Connection::open_in_memory().map_err(db_error)?)
    }

    fn initialize(conn: Connection) -> Result<Self, CacheError> {
        conn.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T, CacheError>) -> Result<T, CacheError> {
        let conn = self.conn.lock().map_err(|_| CacheError::LockPoisoned)?;
        f(&conn)
    }
}

impl CacheStore for SqliteStore {
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1 FROM cache_entries WHERE key = ?1", params![key], |_| Ok(()))
                .optional()
                .map(|row| row.is_some())
                .map_err(db_error)
        })
    }

    fn read(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let payload: Option<String> = self.with_conn(|conn| {
            conn.query_row(
                "SELECT payload FROM cache_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)
        })?;
        payload
            .map(|p| {
                serde_json::from_str(&p).map_err(|e| CacheError::Serialization {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    fn write(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let payload = serde_json::to_string(entry).map_err(|e| CacheError::Serialization {
            key: entry.key.clone(),
            message: e.to_string(),
        })?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO cache_entries (key, payload, modified_ms) VALUES (?1, ?2, ?3)",
                params![entry.key, payload, now_ms() as i64],
            )
            .map(|_| ())
            .map_err(db_error)
        })
    }

    fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM cache_entries WHERE key = ?1", params![key])
                .map(|n| n > 0)
                .map_err(db_error)
        })
    }

    fn modified(&self, key: &str) -> Result<Option<u64>, CacheError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT modified_ms FROM cache_entries WHERE key = ?1",
                params![key],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map(|ms| ms.map(|ms| ms as u64))
            .map_err(db_error)
        })
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM cache_entries").map_err(db_error)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(db_error)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(db_error)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::types::ParseResult;
    use crate::scanner::language_detect::Language;

    fn entry(key: &str, branch: &str) -> CacheEntry {
        CacheEntry {
            key: key.to_string(),
            file_path: "svc.go".to_string(),
            project_root: "/repo".to_string(),
            branch: branch.to_string(),
            commit: Some("abc".to_string()),
            created_at_ms: 10,
            last_accessed_ms: 10,
            result: ParseResult::empty("svc.go", Language::Go, 7, Some("err".to_string())),
        }
    }

    #[test]
    fn round_trips_entries() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.write(&entry("k", "main")).unwrap();
        assert!(store.exists("k").unwrap());
        assert_eq!(store.read("k").unwrap().unwrap(), entry("k", "main"));
        store.write(&entry("k", "dev")).unwrap();
        assert_eq!(store.read("k").unwrap().unwrap().branch, "dev");
        assert_eq!(store.keys().unwrap(), vec!["k".to_string()]);
        assert!(store.modified("k").unwrap().is_some());
        assert!(store.delete("k").unwrap());
        assert!(store.read("k").unwrap().is_none());
    }

    #[test]
    fn file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        SqliteStore::open(&path).unwrap().write(&entry("k", "main")).unwrap();
        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened.exists("k").unwrap());
    }
}
