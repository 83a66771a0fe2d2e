//! Tests for the polyglot configuration system.

use std::sync::Mutex;
use std::time::Duration;

use polyglot_core::config::{ConfigOverrides, PolyglotConfig};
use polyglot_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all POLYGLOT_ env vars to prevent cross-test contamination.
fn clear_env_vars() {
    for key in [
        "POLYGLOT_ANALYSIS_ENABLED",
        "POLYGLOT_ANALYSIS_THREADS",
        "POLYGLOT_CACHE_ENABLED",
        "POLYGLOT_CACHE_MAX_AGE",
        "POLYGLOT_CACHE_MAX_SIZE",
        "POLYGLOT_CACHE_DIR",
        "POLYGLOT_PARSER_TIMEOUT_MS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_match_documented_values() {
    let config = PolyglotConfig::default();
    assert!(config.analysis.effective_enabled());
    assert!(config.cache.effective_enabled());
    assert_eq!(
        config.cache.effective_max_age().unwrap(),
        Duration::from_secs(2 * 3600)
    );
    assert_eq!(config.parser.primary_timeout(), Duration::from_secs(5));
    assert_eq!(config.parser.recovery_budget(), Duration::from_millis(50));
    assert_eq!(config.parser.fallback_budget(), Duration::from_millis(100));
}

#[test]
fn layered_resolution_env_beats_project_and_overrides_beat_env() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("polyglot.toml"),
        r#"
[analysis]
supported_languages = ["python", "go"]

[cache]
max_age = "30m"
max_size = 500
"#,
    )
    .unwrap();

    std::env::set_var("POLYGLOT_CACHE_MAX_SIZE", "750");

    let overrides = ConfigOverrides {
        cache_max_age: Some("10m".to_string()),
        ..Default::default()
    };
    let config = PolyglotConfig::load(dir.path(), Some(&overrides)).unwrap();
    clear_env_vars();

    assert_eq!(config.cache.effective_max_size(), 750);
    assert_eq!(
        config.cache.effective_max_age().unwrap(),
        Duration::from_secs(600)
    );
    assert!(config.analysis.language_enabled("Python"));
    assert!(!config.analysis.language_enabled("java"));
}

#[test]
fn invalid_project_toml_is_a_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("polyglot.toml"), "[cache\nmax_age = ").unwrap();
    let err = PolyglotConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn invalid_max_age_fails_validation() {
    let err = PolyglotConfig::from_toml("[cache]\nmax_age = \"forever\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "cache.max_age"));
}

#[test]
fn oversized_max_age_is_a_config_error() {
    let err = PolyglotConfig::from_toml("[cache]\nmax_age = \"999999999999999999d\"\n").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue { ref field, ref message } if field == "cache.max_age" && message.contains("out of range")
    ));
}

#[test]
fn zero_max_size_fails_validation() {
    let err = PolyglotConfig::from_toml("[cache]\nmax_size = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}

#[test]
fn toml_round_trip_preserves_values() {
    let config = PolyglotConfig::from_toml(
        "[cache]\nenabled = false\nmax_age = \"1h30m\"\n[parser]\nprimary_timeout_ms = 250\n",
    )
    .unwrap();
    let rendered = config.to_toml().unwrap();
    let reparsed = PolyglotConfig::from_toml(&rendered).unwrap();
    assert!(!reparsed.cache.effective_enabled());
    assert_eq!(reparsed.parser.primary_timeout(), Duration::from_millis(250));
    assert_eq!(
        reparsed.cache.effective_max_age().unwrap(),
        Duration::from_secs(5400)
    );
}

#[test]
fn relative_cache_directory_resolves_against_root() {
    let config = PolyglotConfig::from_toml("[cache]\ndirectory = \"tmp/cache\"\n").unwrap();
    let root = std::path::Path::new("/projects/app");
    assert_eq!(
        config.cache.effective_directory(root),
        root.join("tmp/cache")
    );
}
