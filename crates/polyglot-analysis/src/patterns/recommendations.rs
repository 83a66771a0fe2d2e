//! Prioritized suggestions derived from the graph and detected patterns.

use serde::{Deserialize, Serialize};

use super::types::{DetectionResult, Severity};
use crate::graph::{DependencyGraph, InterfaceDescriptor};
use polyglot_core::types::collections::FxHashSet;

/// Cross-language edge count above which dependency reduction is advised.
pub const CROSS_LANGUAGE_EDGE_LIMIT: usize = 10;
/// Distinct interface families above which standardization is advised.
pub const INTERFACE_TYPE_LIMIT: usize = 3;

/// Ordered highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    /// Short machine-friendly tag, e.g. "dependency-reduction" or a pattern type.
    pub category: String,
    pub message: String,
    pub nodes: Vec<String>,
}

pub fn generate(
    graph: &DependencyGraph,
    detection: &DetectionResult,
    interfaces: &[InterfaceDescriptor],
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    let cross = graph.cross_language_edges.len();
    if cross > CROSS_LANGUAGE_EDGE_LIMIT {
        out.push(Recommendation {
            priority: Priority::High,
            category: "dependency-reduction".to_string(),
            message: format!(
                "{cross} cross-language dependencies found; reduce direct coupling between \
                 languages by routing calls through a small set of interfaces"
            ),
            nodes: Vec::new(),
        });
    }

    let tags: FxHashSet<_> = interfaces.iter().map(|d| d.interface_type).collect();
    if tags.len() > INTERFACE_TYPE_LIMIT {
        let mut names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
        names.sort_unstable();
        out.push(Recommendation {
            priority: Priority::Medium,
            category: "interface-standardization".to_string(),
            message: format!(
                "{} interface styles in use ({}); standardize on fewer communication mechanisms",
                names.len(),
                names.join(", ")
            ),
            nodes: Vec::new(),
        });
    }

    for pattern in &detection.patterns {
        out.push(Recommendation {
            priority: Priority::Low,
            category: pattern.pattern_type.as_str().to_string(),
            message: pattern.recommendation.clone(),
            nodes: pattern.nodes.clone(),
        });
    }
    for anti in &detection.anti_patterns {
        out.push(Recommendation {
            priority: match anti.severity {
                Severity::High => Priority::High,
                Severity::Medium => Priority::Medium,
                Severity::Low => Priority::Low,
            },
            category: anti.pattern_type.as_str().to_string(),
            message: anti.recommendation.clone(),
            nodes: anti.nodes.clone(),
        });
    }

    // Stable: equal priorities keep insertion order.
    out.sort_by_key(|r| r.priority);
    out
}
