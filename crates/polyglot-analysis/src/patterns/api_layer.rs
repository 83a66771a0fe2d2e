//! Fan-in hubs reached from another language.

use super::types::{Pattern, PatternType};
use crate::graph::DependencyGraph;

const MIN_INCOMING: usize = 3;

pub fn detect(graph: &DependencyGraph) -> Option<Pattern> {
    let mut candidates: Vec<String> = graph
        .nodes()
        .filter(|node| {
            let incoming = graph.incoming(&node.id);
            incoming.len() > MIN_INCOMING && incoming.iter().any(|e| e.is_cross_language())
        })
        .map(|node| node.id.clone())
        .collect();
    if candidates.is_empty() {
        return None;
    }
    candidates.sort();

    Some(Pattern {
        pattern_type: PatternType::ApiLayer,
        confidence: (candidates.len() as f64 * 0.3).min(0.9),
        description: format!(
            "{} module(s) act as an API layer with high fan-in across languages",
            candidates.len()
        ),
        recommendation: "Keep API-layer modules thin and document their contracts so callers \
                         in other languages stay in sync"
            .to_string(),
        nodes: candidates,
    })
}
