//! Architecture pattern and anti-pattern detection over a finished graph.

pub mod api_layer;
pub mod communication;
pub mod cycles;
pub mod microservices;
pub mod recommendations;
pub mod shared_library;
pub mod types;

use std::time::Instant;

use crate::graph::DependencyGraph;

pub use recommendations::{generate as generate_recommendations, Priority, Recommendation};
pub use types::{AntiPattern, DetectionResult, Pattern, PatternType, Severity};

/// Run every detector pass in parallel; each only reads the graph.
pub fn detect_all(graph: &DependencyGraph) -> DetectionResult {
    let start = Instant::now();
    let ((microservices, api_layer), ((shared, communication), cycles)) = rayon::join(
        || rayon::join(|| microservices::detect(graph), || api_layer::detect(graph)),
        || {
            rayon::join(
                || rayon::join(|| shared_library::detect(graph), || communication::detect(graph)),
                || cycles::detect(graph),
            )
        },
    );

    let mut patterns: Vec<Pattern> = Vec::new();
    patterns.extend(microservices);
    patterns.extend(api_layer);
    patterns.extend(shared);
    patterns.extend(communication);

    tracing::debug!(
        patterns = patterns.len(),
        anti_patterns = cycles.len(),
        pattern_detection_time = start.elapsed().as_millis() as u64,
        "pattern detection complete"
    );
    DetectionResult {
        patterns,
        anti_patterns: cycles,
    }
}
