//! Error classification and bounded-time repair.
//!
//! Repaired content is advisory. It is mined heuristically by the caller
//! and never handed back to the primary parser.

pub mod classifier;
pub mod engine;
pub mod strategies;
pub mod suggestions;

pub use classifier::{classify, ErrorCategory};
pub use engine::{RecoveryEngine, RecoveryResult, StrategyAttempt};
pub use strategies::{RecoveredOutput, RecoveryStrategy, StrategyOutcome};
