//! Line-oriented rule matching shared by the built-in detectors.

use regex::{Captures, Regex};

use super::InterfaceContext;
use crate::graph::types::{InterfaceDescriptor, InterfaceRole, InterfaceType};
use polyglot_core::types::collections::BTreeMap;

/// One regex that recognizes an interface declaration or call site.
///
/// Recognized capture groups: `path`, `name`, `method`, `methods`
/// (a comma-separated list).
pub(crate) struct InterfaceRule {
    pattern: Regex,
    interface_type: InterfaceType,
    role: InterfaceRole,
    framework: &'static str,
    requires: Option<&'static str>,
}

impl InterfaceRule {
    /// Panics on an invalid pattern; rules are static literals.
    pub(crate) fn new(
        pattern: &str,
        interface_type: InterfaceType,
        role: InterfaceRole,
        framework: &'static str,
    ) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            interface_type,
            role,
            framework,
            requires: None,
        }
    }

    /// Only apply when the file mentions `marker` in content or imports.
    pub(crate) fn requires(mut self, marker: &'static str) -> Self {
        self.requires = Some(marker);
        self
    }

    fn describe(&self, ctx: &InterfaceContext<'_>, caps: &Captures<'_>, line: usize) -> InterfaceDescriptor {
        let mut properties = BTreeMap::new();
        properties.insert("line".to_string(), line.to_string());

        let mut path = caps.name("path").map(|m| m.as_str().trim().to_string());
        let mut method = caps.name("method").map(|m| normalize_method(m.as_str()));
        if let Some(list) = caps.name("methods") {
            let joined: Vec<String> = list
                .as_str()
                .split(',')
                .map(|m| m.trim().trim_matches(|c| c == '\'' || c == '"').to_uppercase())
                .filter(|m| !m.is_empty())
                .collect();
            if !joined.is_empty() {
                method = Some(joined.join(","));
            }
        }
        // Method-qualified route patterns: "GET /users".
        if let Some((verb, rest)) = path.as_deref().and_then(|p| p.split_once(' ')) {
            if !verb.is_empty() && verb.chars().all(|c| c.is_ascii_uppercase()) {
                method = Some(verb.to_string());
                path = Some(rest.trim().to_string());
            }
        }
        if let Some(method) = method {
            properties.insert("method".to_string(), method);
        }

        InterfaceDescriptor {
            language: ctx.language,
            file: ctx.file.to_string(),
            interface_type: self.interface_type,
            framework: self.framework.to_string(),
            role: self.role,
            name: caps.name("name").map(|m| m.as_str().to_string()),
            path,
            properties,
        }
    }
}

/// Run every applicable rule over each line of the file.
pub(crate) fn apply_rules(rules: &[InterfaceRule], ctx: &InterfaceContext<'_>) -> Vec<InterfaceDescriptor> {
    let active: Vec<&InterfaceRule> = rules
        .iter()
        .filter(|r| r.requires.map_or(true, |marker| ctx.mentions(marker)))
        .collect();
    if active.is_empty() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for (idx, line) in ctx.content.lines().enumerate() {
        for rule in &active {
            for caps in rule.pattern.captures_iter(line) {
                found.push(rule.describe(ctx, &caps, idx + 1));
            }
        }
    }
    found
}

/// `getForObject` → `GET`, `Post` → `POST`, `Request`/`all` → `ANY`.
fn normalize_method(raw: &str) -> String {
    let mut verb = String::new();
    let mut prev_lower = false;
    for c in raw.chars() {
        if prev_lower && c.is_uppercase() {
            break;
        }
        prev_lower = c.is_lowercase();
        verb.push(c);
    }
    let verb = verb.to_uppercase();
    match verb.as_str() {
        "REQUEST" | "ALL" | "ANY" | "EXCHANGE" => "ANY".to_string(),
        _ => verb,
    }
}
