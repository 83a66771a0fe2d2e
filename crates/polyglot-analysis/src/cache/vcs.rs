//! Version-control scope detection for cache keys.

use std::path::Path;

use git2::Repository;

use super::key::{CacheScope, DEFAULT_BRANCH};

/// Derives a [`CacheScope`] from the git repository enclosing a project root.
pub struct VcsScope;

impl VcsScope {
    /// Branch shorthand and HEAD commit of the enclosing repository.
    /// Without a repository (or with an unborn HEAD) the scope is
    /// `"default"` with no commit.
    pub fn detect(root: &Path) -> CacheScope {
        match Self::head_of(root) {
            Some((branch, commit)) => {
                tracing::debug!(root = %root.display(), %branch, ?commit, "detected vcs scope");
                let scope = CacheScope::new(root, branch);
                match commit {
                    Some(commit) => scope.with_commit(commit),
                    None => scope,
                }
            }
            None => CacheScope::new(root, DEFAULT_BRANCH),
        }
    }

    fn head_of(root: &Path) -> Option<(String, Option<String>)> {
        let repo = Repository::discover(root).ok()?;
        let head = match repo.head() {
            Ok(head) => head,
            Err(e) => {
                tracing::debug!(root = %root.display(), error = %e, "no readable HEAD");
                return None;
            }
        };
        let branch = head.shorthand()?.to_string();
        let commit = head.peel_to_commit().ok().map(|c| c.id().to_string());
        Some((branch, commit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_directory_uses_default_branch() {
        let dir = tempfile::tempdir().unwrap();
        let scope = VcsScope::detect(dir.path());
        assert_eq!(scope.branch, DEFAULT_BRANCH);
        assert!(scope.commit.is_none());
    }

    #[test]
    fn repository_head_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let sig = git2::Signature::now("dev", "dev@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let oid = repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[]).unwrap();

        let scope = VcsScope::detect(dir.path());
        assert_ne!(scope.branch, DEFAULT_BRANCH);
        assert_eq!(scope.commit, Some(oid.to_string()));
    }
}
