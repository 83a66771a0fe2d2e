//! Language-homogeneous clusters joined only by cross-language edges.

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::types::{Pattern, PatternType};
use crate::graph::DependencyGraph;

/// Weakly-connected clusters that never cross a language boundary.
/// Returns one cluster id per node index.
pub fn language_clusters(graph: &DependencyGraph) -> (Vec<usize>, usize) {
    let g = &graph.graph;
    let mut cluster_of = vec![usize::MAX; g.node_count()];
    let mut clusters = 0usize;

    for start in g.node_indices() {
        if cluster_of[start.index()] != usize::MAX {
            continue;
        }
        let mut stack: Vec<NodeIndex> = vec![start];
        cluster_of[start.index()] = clusters;
        while let Some(node) = stack.pop() {
            let neighbors = g
                .edges_directed(node, Direction::Outgoing)
                .map(|e| (e.target(), e.weight().is_cross_language()))
                .chain(
                    g.edges_directed(node, Direction::Incoming)
                        .map(|e| (e.source(), e.weight().is_cross_language())),
                );
            for (next, cross) in neighbors {
                if cross || cluster_of[next.index()] != usize::MAX {
                    continue;
                }
                cluster_of[next.index()] = clusters;
                stack.push(next);
            }
        }
        clusters += 1;
    }
    (cluster_of, clusters)
}

pub fn detect(graph: &DependencyGraph) -> Option<Pattern> {
    let (cluster_of, clusters) = language_clusters(graph);
    if clusters <= 1 {
        return None;
    }

    let g = &graph.graph;
    let mut nodes: Vec<String> = Vec::new();
    let mut cross_cluster = 0usize;
    for edge in g.edge_references() {
        if !edge.weight().is_cross_language() {
            continue;
        }
        if cluster_of[edge.source().index()] == cluster_of[edge.target().index()] {
            continue;
        }
        cross_cluster += 1;
        nodes.push(g[edge.source()].id.clone());
        nodes.push(g[edge.target()].id.clone());
    }
    if cross_cluster == 0 {
        return None;
    }
    nodes.sort();
    nodes.dedup();

    let confidence = microservices_confidence(clusters, cross_cluster);
    Some(Pattern {
        pattern_type: PatternType::Microservices,
        confidence,
        description: format!(
            "{clusters} single-language clusters connected by {cross_cluster} cross-language edges"
        ),
        recommendation: "Define explicit service contracts at the cluster boundaries and keep \
                         cross-service calls behind versioned interfaces"
            .to_string(),
        nodes,
    })
}

fn microservices_confidence(clusters: usize, cross_edges: usize) -> f64 {
    let base = (clusters as f64 * 0.2).min(0.8);
    let penalty = (cross_edges as f64 * 0.05).min(0.3);
    (base - penalty).max(0.1)
}
