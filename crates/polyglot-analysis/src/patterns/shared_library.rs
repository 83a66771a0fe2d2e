//! Modules reaching into several other-language modules.

use super::types::{Pattern, PatternType};
use crate::graph::DependencyGraph;

const MIN_CROSS_OUTGOING: usize = 2;

pub fn detect(graph: &DependencyGraph) -> Vec<Pattern> {
    let mut found: Vec<Pattern> = graph
        .nodes()
        .filter_map(|node| {
            let count = graph
                .outgoing(&node.id)
                .iter()
                .filter(|e| e.is_cross_language())
                .count();
            (count > MIN_CROSS_OUTGOING).then(|| Pattern {
                pattern_type: PatternType::SharedLibrary,
                confidence: (count as f64 * 0.2).min(0.9),
                description: format!(
                    "{} has {count} cross-language dependencies",
                    node.id
                ),
                recommendation: format!(
                    "Consider extracting what {} shares across languages into a dedicated library with a stable interface",
                    node.id
                ),
                nodes: vec![node.id.clone()],
            })
        })
        .collect();
    found.sort_by(|a, b| a.nodes.cmp(&b.nodes));
    found
}
