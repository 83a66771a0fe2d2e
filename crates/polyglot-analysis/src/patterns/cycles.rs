//! Dependency cycles that cross a language boundary.

use petgraph::algo::tarjan_scc;
use petgraph::visit::EdgeRef;

use super::types::{AntiPattern, PatternType, Severity};
use crate::graph::DependencyGraph;
use polyglot_core::types::collections::FxHashSet;

const CYCLE_CONFIDENCE: f64 = 0.9;

/// One anti-pattern per strongly connected component of two or more nodes
/// that contains at least one cross-language edge.
pub fn detect(graph: &DependencyGraph) -> Vec<AntiPattern> {
    let g = &graph.graph;
    let mut found: Vec<AntiPattern> = tarjan_scc(g)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .filter_map(|scc| {
            let members: FxHashSet<_> = scc.iter().copied().collect();
            let crosses = scc.iter().any(|&n| {
                g.edges(n).any(|e| members.contains(&e.target()) && e.weight().is_cross_language())
            });
            if !crosses {
                return None;
            }
            let mut nodes: Vec<String> = scc.iter().map(|&n| g[n].id.clone()).collect();
            nodes.sort();
            let mut languages: Vec<&str> = scc.iter().map(|&n| g[n].language.name()).collect();
            languages.sort_unstable();
            languages.dedup();
            Some(AntiPattern {
                pattern_type: PatternType::CrossLanguageCircularDependency,
                confidence: CYCLE_CONFIDENCE,
                severity: Severity::High,
                description: format!(
                    "Circular dependency across {} between {}",
                    languages.join(", "),
                    nodes.join(" -> ")
                ),
                recommendation: "Break the cycle by introducing an interface or message boundary \
                                 so one side no longer depends on the other"
                    .to_string(),
                nodes,
            })
        })
        .collect();
    found.sort_by(|a, b| a.nodes.cmp(&b.nodes));
    found
}
