//! Default file discovery: `ignore` walk + globset exclusions.
//!
//! Discovery is an external collaborator of the pipeline; this walker is
//! the default implementation so the crate can analyze a directory on its own.

use std::path::Path;
use std::time::Instant;

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use polyglot_core::config::AnalysisConfig;
use polyglot_core::errors::ScanError;

use super::types::{DiscoveryStats, SourceFile};

/// Directories never descended into.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "target",
    "build",
    "dist",
    "out",
    "vendor",
    "bin",
    "obj",
    ".git",
    ".svn",
    ".hg",
    ".idea",
    ".vscode",
    ".polyglot",
    "coverage",
];

/// Discover analyzable source files under `root`.
///
/// Fatal only when the root itself is unusable or an exclude pattern is
/// malformed; unreadable entries below the root are skipped.
pub fn discover_files(root: &Path, config: &AnalysisConfig) -> Result<Vec<SourceFile>, ScanError> {
    discover_files_with_stats(root, config).map(|(files, _)| files)
}

/// Same as [`discover_files`] but also returns discovery statistics.
pub fn discover_files_with_stats(
    root: &Path,
    config: &AnalysisConfig,
) -> Result<(Vec<SourceFile>, DiscoveryStats), ScanError> {
    let start = Instant::now();

    if !root.exists() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    std::fs::read_dir(root).map_err(|e| ScanError::Io {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;

    let excludes = build_exclude_set(&config.exclude_patterns)?;
    let max_file_size = config.effective_max_file_size();

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .filter_entry(|entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| DEFAULT_IGNORE_DIRS.contains(&name)))
        })
        .build();

    let mut stats = DiscoveryStats::default();
    let mut files = Vec::new();

    for entry in walker.flatten() {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if excludes.is_match(relative) {
            stats.files_skipped_excluded += 1;
            continue;
        }
        let Some(source) = SourceFile::from_path(root, path) else {
            continue;
        };
        if !config.language_enabled(source.language.id()) {
            stats.files_skipped_language += 1;
            continue;
        }
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if size > max_file_size {
            tracing::debug!(file = %source.relative_path, size, "skipping large file");
            stats.files_skipped_large += 1;
            continue;
        }

        stats.total_size_bytes += size;
        *stats.languages_found.entry(source.language).or_insert(0) += 1;
        files.push(source);
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    stats.total_files = files.len();
    stats.duration_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        root = %root.display(),
        files = stats.total_files,
        duration_ms = stats.duration_ms,
        "discovery complete"
    );

    Ok((files, stats))
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScanError::InvalidPattern {
        pattern: patterns.join(","),
        message: e.to_string(),
    })
}
