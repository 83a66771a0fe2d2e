//! Recurring cross-language communication channels.

use polyglot_core::types::collections::BTreeMap;

use super::types::{Pattern, PatternType};
use crate::graph::{DependencyEdge, DependencyGraph, EdgeType};

const COMMUNICATION_CONFIDENCE: f64 = 0.8;

pub fn detect(graph: &DependencyGraph) -> Vec<Pattern> {
    let mut groups: BTreeMap<EdgeType, Vec<&DependencyEdge>> = BTreeMap::new();
    for edge in &graph.cross_language_edges {
        groups.entry(edge.edge_type).or_default().push(edge);
    }

    groups
        .into_iter()
        .filter(|(_, edges)| edges.len() > 1)
        .map(|(edge_type, edges)| {
            let mut nodes: Vec<String> = edges
                .iter()
                .flat_map(|e| [e.source.clone(), e.target.clone()])
                .collect();
            nodes.sort();
            nodes.dedup();
            let mut tags: Vec<&str> = edges
                .iter()
                .filter_map(|e| e.interface_type.map(|t| t.as_str()))
                .collect();
            tags.sort_unstable();
            tags.dedup();
            let via = if tags.is_empty() {
                String::new()
            } else {
                format!(" ({})", tags.join(", "))
            };
            Pattern {
                pattern_type: PatternType::CommunicationPattern,
                confidence: COMMUNICATION_CONFIDENCE,
                description: format!(
                    "{} cross-language {edge_type} edges{via}",
                    edges.len()
                ),
                recommendation: format!(
                    "Standardize {edge_type}-based communication between languages with shared schemas"
                ),
                nodes,
            }
        })
        .collect()
}
