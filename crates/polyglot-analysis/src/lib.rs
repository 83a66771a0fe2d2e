//! Multi-language source analysis: resilient parsing with recovery and
//! fallback extraction, a branch-aware analysis cache, a cross-language
//! dependency graph, and architecture pattern detection.
//!
//! [`pipeline::Analyzer`] ties the stages together.

pub mod cache;
pub mod fallback;
pub mod graph;
pub mod parsers;
pub mod patterns;
pub mod pipeline;
pub mod recovery;
pub mod scanner;

pub use pipeline::{AnalysisCancellation, AnalysisReport, Analyzer};
