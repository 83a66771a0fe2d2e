//! Analysis cache behavior across branches, expiry and persistent stores.

use std::sync::Arc;
use std::time::Duration;

use polyglot_analysis::cache::{AnalysisCache, CacheScope, FileStore, SqliteStore, DEFAULT_MAX_AGE};
use polyglot_analysis::parsers::{ParseOrchestrator, ParseResult, ParserRegistry};
use polyglot_analysis::scanner::Language;

const CONTENT: &[u8] = b"def handler(event):\n    return event\n";

fn parsed() -> ParseResult {
    ParseOrchestrator::new(ParserRegistry::with_defaults()).parse("svc/handler.py", CONTENT, Language::Python)
}

#[test]
fn branches_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let cache = AnalysisCache::in_memory(DEFAULT_MAX_AGE);
    let main = CacheScope::new(dir.path(), "main");
    let feature = CacheScope::new(dir.path(), "feature-x");

    assert!(cache.set("svc/handler.py", CONTENT, &main, &parsed()));
    assert!(cache.get("svc/handler.py", CONTENT, &feature).is_none());

    let hit = cache.get("svc/handler.py", CONTENT, &main).unwrap();
    assert_eq!(hit.functions[0].name, "handler");
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

#[test]
fn commit_is_part_of_the_scope() {
    let dir = tempfile::tempdir().unwrap();
    let cache = AnalysisCache::in_memory(DEFAULT_MAX_AGE);
    let first = CacheScope::new(dir.path(), "main").with_commit("a1b2c3");
    let second = CacheScope::new(dir.path(), "main").with_commit("d4e5f6");

    cache.set("svc/handler.py", CONTENT, &first, &parsed());
    assert!(cache.get("svc/handler.py", CONTENT, &second).is_none());
    assert!(cache.get("svc/handler.py", CONTENT, &first).is_some());
}

#[test]
fn entries_expire_after_max_age() {
    let dir = tempfile::tempdir().unwrap();
    let cache = AnalysisCache::in_memory(Duration::from_millis(50));
    let scope = CacheScope::new(dir.path(), "main");

    cache.set("svc/handler.py", CONTENT, &scope, &parsed());
    std::thread::sleep(Duration::from_millis(150));

    assert!(cache.get("svc/handler.py", CONTENT, &scope).is_none());
    assert_eq!(cache.stats().deletes, 1);
    // Deleted on the expired read, so the next lookup is a plain miss.
    assert!(cache.get("svc/handler.py", CONTENT, &scope).is_none());
    assert_eq!(cache.stats().deletes, 1);
}

#[test]
fn branch_invalidation_leaves_other_branches_on_disk() {
    let project = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(cache_dir.path()).unwrap());
    let cache = AnalysisCache::new(store, DEFAULT_MAX_AGE);
    let main = CacheScope::new(project.path(), "main");
    let feature = CacheScope::new(project.path(), "feature-x");

    cache.set("svc/handler.py", CONTENT, &main, &parsed());
    cache.set("svc/handler.py", CONTENT, &feature, &parsed());
    cache.set("svc/other.py", b"x = 1\n", &feature, &parsed());

    assert_eq!(cache.invalidate_branch("feature-x"), 2);
    assert!(cache.get("svc/handler.py", CONTENT, &feature).is_none());
    assert!(cache.get("svc/handler.py", CONTENT, &main).is_some());

    let files: Vec<_> = std::fs::read_dir(cache_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with(".json"));
}

#[test]
fn file_store_survives_reopen() {
    let project = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();
    let scope = CacheScope::new(project.path(), "main");
    {
        let store = Arc::new(FileStore::open(cache_dir.path()).unwrap());
        AnalysisCache::new(store, DEFAULT_MAX_AGE).set("svc/handler.py", CONTENT, &scope, &parsed());
    }
    let store = Arc::new(FileStore::open(cache_dir.path()).unwrap());
    let cache = AnalysisCache::new(store, DEFAULT_MAX_AGE);
    assert!(cache.get("svc/handler.py", CONTENT, &scope).is_some());
}

#[test]
fn sqlite_store_backs_the_cache() {
    let project = tempfile::tempdir().unwrap();
    let cache = AnalysisCache::new(Arc::new(SqliteStore::open_in_memory().unwrap()), DEFAULT_MAX_AGE);
    let main = CacheScope::new(project.path(), "main");

    cache.set("svc/handler.py", CONTENT, &main, &parsed());
    cache.set("svc/other.py", b"y = 2\n", &main, &parsed());
    assert_eq!(cache.invalidate_file("svc/handler.py", project.path()), 1);
    assert!(cache.get("svc/handler.py", CONTENT, &main).is_none());
    assert!(cache.get("svc/other.py", b"y = 2\n", &main).is_some());
    assert_eq!(cache.clear(), 1);
}
