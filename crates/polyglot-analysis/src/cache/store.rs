//! Backing stores for the analysis cache.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::UNIX_EPOCH;

use polyglot_core::errors::CacheError;
use polyglot_core::types::collections::FxHashMap;

use super::entry::{now_ms, CacheEntry};

/// Key-addressed persistence for cache entries.
///
/// Implementations must make `write` atomic per key: a concurrent reader
/// sees either the old entry or the new one, never a torn write.
pub trait CacheStore: Send + Sync {
    fn exists(&self, key: &str) -> Result<bool, CacheError>;
    fn read(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;
    fn write(&self, entry: &CacheEntry) -> Result<(), CacheError>;
    /// Returns whether an entry was removed.
    fn delete(&self, key: &str) -> Result<bool, CacheError>;
    /// Last write time in Unix milliseconds.
    fn modified(&self, key: &str) -> Result<Option<u64>, CacheError>;
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

// ---- MemoryStore ----

/// Lock-protected in-memory store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<FxHashMap<String, (CacheEntry, u64)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries.contains_key(key))
    }

    fn read(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries.get(key).map(|(entry, _)| entry.clone()))
    }

    fn write(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        entries.insert(entry.key.clone(), (entry.clone(), now_ms()));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries.remove(key).is_some())
    }

    fn modified(&self, key: &str) -> Result<Option<u64>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries.get(key).map(|(_, modified)| *modified))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

// ---- FileStore ----

const ENTRY_SUFFIX: &str = ".json";

/// One JSON file per key under a cache directory.
/// Writes go to a temp file in the same directory and are renamed into place.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| CacheError::Io {
            key: root.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            root,
            tmp_counter: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}{ENTRY_SUFFIX}"))
    }

    fn io_error(key: &str, e: std::io::Error) -> CacheError {
        CacheError::Io {
            key: key.to_string(),
            message: e.to_string(),
        }
    }
}

impl CacheStore for FileStore {
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.path_for(key).is_file())
    }

    fn read(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let bytes = match fs::read(self.path_for(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(key, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| CacheError::Serialization {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn write(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let payload = serde_json::to_vec(entry).map_err(|e| CacheError::Serialization {
            key: entry.key.clone(),
            message: e.to_string(),
        })?;
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .root
            .join(format!(".{}.{}.{n}.tmp", entry.key, std::process::id()));
        fs::write(&tmp, payload).map_err(|e| Self::io_error(&entry.key, e))?;
        if let Err(e) = fs::rename(&tmp, self.path_for(&entry.key)) {
            let _ = fs::remove_file(&tmp);
            return Err(Self::io_error(&entry.key, e));
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn modified(&self, key: &str) -> Result<Option<u64>, CacheError> {
        let metadata = match fs::metadata(self.path_for(key)) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(key, e)),
        };
        let modified = metadata.modified().map_err(|e| Self::io_error(key, e))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_millis() as u64))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let dir = fs::read_dir(&self.root).map_err(|e| Self::io_error("<keys>", e))?;
        let mut keys = Vec::new();
        for entry in dir.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with('.') {
                continue;
            }
            if let Some(key) = name.strip_suffix(ENTRY_SUFFIX) {
                keys.push(key.to_string());
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::types::ParseResult;
    use crate::scanner::language_detect::Language;

    fn entry(key: &str) -> CacheEntry {
        CacheEntry {
            key: key.to_string(),
            file_path: "a.py".to_string(),
            project_root: "/repo".to_string(),
            branch: "main".to_string(),
            commit: None,
            created_at_ms: 1,
            last_accessed_ms: 1,
            result: ParseResult::empty("a.py", Language::Python, 0, None),
        }
    }

    fn exercise(store: &dyn CacheStore) {
        assert!(!store.exists("k1").unwrap());
        assert!(store.read("k1").unwrap().is_none());
        store.write(&entry("k1")).unwrap();
        store.write(&entry("k2")).unwrap();
        assert!(store.exists("k1").unwrap());
        assert_eq!(store.read("k1").unwrap().unwrap(), entry("k1"));
        assert!(store.modified("k1").unwrap().is_some());
        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["k1".to_string(), "k2".to_string()]);
        assert!(store.delete("k1").unwrap());
        assert!(!store.delete("k1").unwrap());
        assert_eq!(store.keys().unwrap(), vec!["k2".to_string()]);
    }

    #[test]
    fn memory_store_contract() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn file_store_contract() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("cache")).unwrap();
        exercise(&store);
        // No temp files left behind.
        let leftovers = fs::read_dir(store.root())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn file_store_reports_corrupt_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("bad.json"), b"{not json").unwrap();
        assert!(matches!(store.read("bad"), Err(CacheError::Serialization { .. })));
    }
}
