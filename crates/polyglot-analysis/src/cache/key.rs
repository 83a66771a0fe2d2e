//! Cache scope and deterministic cache keys.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scanner::hasher::{hash_content, hash_hex128};

/// Branch used when no version control information is available.
pub const DEFAULT_BRANCH: &str = "default";

/// Where a cached result is valid: project, branch, and optionally commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheScope {
    pub project_root: PathBuf,
    pub branch: String,
    pub commit: Option<String>,
}

impl CacheScope {
    pub fn new(project_root: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            branch: branch.into(),
            commit: None,
        }
    }

    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    pub fn root_str(&self) -> String {
        normalize_root(&self.project_root)
    }
}

/// xxh3-128 over (file, project root, branch, commit, content fingerprint),
/// NUL-separated so adjacent fields cannot run together.
pub fn cache_key(file: &str, scope: &CacheScope, content: &[u8]) -> String {
    let fingerprint = format!("{:016x}", hash_content(content));
    let mut material = String::with_capacity(file.len() + fingerprint.len() + 64);
    let root = scope.root_str();
    let fields: [&str; 5] = [
        file,
        &root,
        &scope.branch,
        scope.commit.as_deref().unwrap_or(""),
        &fingerprint,
    ];
    for field in fields {
        material.push_str(field);
        material.push('\0');
    }
    hash_hex128(material.as_bytes())
}

/// Normalize a project root for comparisons against stored entries.
pub fn normalize_root(root: &Path) -> String {
    root.display().to_string()
}
