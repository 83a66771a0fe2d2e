//! Scanner data types: SourceFile, DiscoveryStats.

use std::path::{Path, PathBuf};

use polyglot_core::types::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use super::language_detect::Language;

/// A discovered source file. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the project root, `/`-separated.
    pub relative_path: String,
    pub language: Language,
    pub extension: String,
}

impl SourceFile {
    /// Build a `SourceFile` for `path` under `root`.
    /// Returns `None` when the extension maps to no known language.
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_string();
        let language = Language::from_extension(Some(&extension))?;
        let relative = path.strip_prefix(root).unwrap_or(path);
        Some(Self {
            path: path.to_path_buf(),
            relative_path: normalize_relative(relative),
            language,
            extension,
        })
    }

    /// Build a `SourceFile` from a relative path alone (tests, in-memory sources).
    pub fn virtual_file(relative_path: &str, language: Language) -> Self {
        let extension = Path::new(relative_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        Self {
            path: PathBuf::from(relative_path),
            relative_path: relative_path.replace('\\', "/"),
            language,
            extension,
        }
    }
}

fn normalize_relative(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Aggregate statistics for a discovery pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryStats {
    pub total_files: usize,
    pub total_size_bytes: u64,
    pub files_skipped_large: usize,
    pub files_skipped_excluded: usize,
    pub files_skipped_language: usize,
    pub languages_found: BTreeMap<Language, usize>,
    pub duration_ms: u64,
}
