//! Analysis pipeline: the produced API for embedders.

pub mod analyzer;
pub mod cancellation;
pub mod report;

pub use analyzer::Analyzer;
pub use cancellation::AnalysisCancellation;
pub use report::{AnalysisReport, ReportedError, RunStats};
