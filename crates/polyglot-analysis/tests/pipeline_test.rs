//! End-to-end analysis over real files on disk.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use polyglot_analysis::cache::{AnalysisCache, CacheScope, DEFAULT_MAX_AGE};
use polyglot_analysis::graph::EdgeType;
use polyglot_analysis::patterns::{PatternType, Severity};
use polyglot_analysis::scanner::{discover_files, Language, SourceFile};
use polyglot_analysis::Analyzer;
use polyglot_core::config::{AnalysisConfig, PolyglotConfig};
use polyglot_core::events::types::{AnalysisCompleteEvent, AntiPatternDetectedEvent};
use polyglot_core::events::{EventDispatcher, PolyglotEventHandler};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn analyzer(root: &Path) -> Analyzer {
    Analyzer::new(root, PolyglotConfig::default())
        .unwrap()
        .with_cache(AnalysisCache::in_memory(DEFAULT_MAX_AGE))
}

#[derive(Default)]
struct Recorder {
    anti_patterns: AtomicUsize,
    completed: AtomicUsize,
}

impl PolyglotEventHandler for Recorder {
    fn on_anti_pattern_detected(&self, _: &AntiPatternDetectedEvent) {
        self.anti_patterns.fetch_add(1, Ordering::SeqCst);
    }
    fn on_analysis_complete(&self, _: &AnalysisCompleteEvent) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn python_import_of_go_file_is_a_cross_language_edge() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", "import b\n\ndef main():\n    return b.hello()\n");
    write(dir.path(), "b.go", "package b\n\nfunc Hello() string {\n\treturn \"hi\"\n}\n");

    let report = analyzer(dir.path()).analyze().unwrap();

    assert_eq!(report.graph.node_count(), 2);
    assert_eq!(report.graph.node("a.py").unwrap().language, Language::Python);
    assert_eq!(report.graph.node("b.go").unwrap().language, Language::Go);
    let edges: Vec<_> = report.graph.edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, "a.py");
    assert_eq!(edges[0].target, "b.go");
    assert_eq!(edges[0].edge_type, EdgeType::Import);
    assert!(edges[0].is_cross_language());
    assert_eq!(report.graph.cross_language_edges.len(), 1);
    assert_eq!(report.cross_language_edge_count, 1);
    assert_eq!(report.language_distribution.get(&Language::Python), Some(&1));
    assert_eq!(report.language_distribution.get(&Language::Go), Some(&1));
    assert!(report.is_clean());
}

#[test]
fn cross_language_cycle_reported_once_with_events() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "alpha.py", "import beta\n");
    write(dir.path(), "beta.ts", "import { run } from './alpha';\nexport const x = 1;\n");

    let recorder = Arc::new(Recorder::default());
    let mut events = EventDispatcher::new();
    events.register(recorder.clone());
    let report = analyzer(dir.path()).with_events(events).analyze().unwrap();

    assert_eq!(report.anti_patterns.len(), 1);
    assert_eq!(
        report.anti_patterns[0].pattern_type,
        PatternType::CrossLanguageCircularDependency
    );
    assert_eq!(report.anti_patterns[0].severity, Severity::High);
    assert_eq!(recorder.anti_patterns.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.completed.load(Ordering::SeqCst), 1);
    assert_eq!(report.recommendations[0].category, "cross-language-circular-dependency");
}

#[test]
fn second_run_is_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", "def f():\n    return 1\n");
    write(dir.path(), "web/app.ts", "export function g() { return 2; }\n");

    let analyzer = analyzer(dir.path());
    let first = analyzer.analyze().unwrap();
    assert_eq!(first.stats.files_analyzed, 2);
    assert_eq!(first.stats.primary, 2);
    assert_eq!(analyzer.cache_stats().writes, 2);

    analyzer.analyze().unwrap();
    assert_eq!(analyzer.cache_stats().hits, 2);
}

#[test]
fn broken_and_unreadable_files_do_not_abort_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "good.py", "def ok():\n    return 1\n");
    write(dir.path(), "bad.py", "def broken(:\n    return\n");
    write(dir.path(), "Main.kt", "fun main() {\n    println(\"hi\")\n}\n");

    let analyzer = analyzer(dir.path());
    let mut files = discover_files(dir.path(), &AnalysisConfig::default()).unwrap();
    files.push(SourceFile::from_path(dir.path(), &dir.path().join("missing.py")).unwrap());

    let report = analyzer.analyze_project(&files).unwrap();
    assert_eq!(report.stats.files_submitted, 4);
    assert_eq!(report.stats.files_analyzed, 3);
    assert_eq!(report.stats.files_failed, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, "SCAN_ERROR");
    assert_eq!(report.graph.node_count(), 3);

    let bad_file = SourceFile::from_path(dir.path(), &dir.path().join("bad.py")).unwrap();
    let bad = analyzer.parse_file(&bad_file, b"def broken(:\n    return\n");
    assert!(bad.success);
    assert_ne!(bad.strategy, "primary");
    assert!(bad.confidence < 1.0);
    assert!(bad.error.is_some());
}

#[test]
fn cancelled_run_skips_every_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", "x = 1\n");
    write(dir.path(), "b.py", "y = 2\n");

    let analyzer = analyzer(dir.path());
    analyzer.cancellation().cancel();
    let report = analyzer.analyze().unwrap();
    assert_eq!(report.stats.files_cancelled, 2);
    assert_eq!(report.graph.node_count(), 0);
    assert!(report.errors.iter().any(|e| e.code == "CANCELLED"));

    analyzer.cancellation().reset();
    assert_eq!(analyzer.analyze().unwrap().graph.node_count(), 2);
}

#[test]
fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let config = PolyglotConfig::from_toml("[cache]\nenabled = false\n").unwrap();
    let analyzer = Analyzer::new(&missing, config)
        .unwrap()
        .with_scope(CacheScope::new(&missing, "main"));
    assert!(analyzer.analyze().is_err());
}

#[test]
fn report_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "server.py", "@app.route('/users')\ndef users():\n    return []\n");
    write(dir.path(), "client.ts", "export async function load() { return fetch('/users'); }\n");

    let report = analyzer(dir.path()).analyze().unwrap();
    assert_eq!(report.interfaces.len(), 2);
    let interface_edges: Vec<_> = report
        .graph
        .edges()
        .filter(|e| e.edge_type == EdgeType::Interface)
        .collect();
    assert_eq!(interface_edges.len(), 1);
    assert_eq!(interface_edges[0].source, "client.ts");

    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["cross_language_edge_count"], 1);
    assert_eq!(value["graph"]["edges"][0]["interface_type"], "rest");
}
