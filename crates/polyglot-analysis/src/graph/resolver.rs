//! Import resolution against the set of known node ids.

use crate::scanner::language_detect::Language;

/// Maps an import's declared source onto candidate node ids.
///
/// Implementations return the indices of every matching candidate, in
/// candidate order. The builder decides what to do with multiple matches.
pub trait ImportResolver: Send + Sync {
    fn name(&self) -> &'static str;
    fn resolve(&self, import_source: &str, candidates: &[String]) -> Vec<usize>;
}

/// Substring containment: the normalized import source must appear in the
/// extension-stripped candidate path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringResolver;

impl ImportResolver for SubstringResolver {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn resolve(&self, import_source: &str, candidates: &[String]) -> Vec<usize> {
        let needle = normalize_import(import_source);
        if needle.is_empty() {
            return Vec::new();
        }
        candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| strip_extension(candidate).contains(needle.as_str()))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Turn an import source into a path fragment:
/// `./lib/util.js` → `lib/util`, `pkg.models` → `pkg/models`,
/// `crate::graph::types` → `graph/types`.
pub fn normalize_import(source: &str) -> String {
    let mut s = source.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`');
    s = strip_extension(s);

    let joined = if s.contains("::") {
        s.replace("::", "/")
    } else if !s.contains('/') {
        // Dotted module path; leading dots are Python relative markers.
        s.trim_start_matches('.').replace('.', "/")
    } else {
        s.to_string()
    };

    let mut rest = joined.as_str();
    loop {
        let before = rest;
        for prefix in ["./", "../", "@/", "~/", "/", "crate/", "self/", "super/"] {
            rest = rest.strip_prefix(prefix).unwrap_or(rest);
        }
        if rest == before {
            break;
        }
    }
    rest.trim_end_matches('/').to_string()
}

/// Drop a trailing source-file extension if it names a known language.
fn strip_extension(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.contains('/')
                && Language::from_extension(Some(ext)).is_some() =>
        {
            stem
        }
        _ => path,
    }
}
