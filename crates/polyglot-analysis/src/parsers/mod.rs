//! Parser subsystem: pluggable primary parsers (tree-sitter by default)
//! and the orchestrator that degrades through recovery and fallback.

pub mod error_tolerant;
pub mod extract;
pub mod languages;
pub mod macros;
pub mod orchestrator;
pub mod registry;
pub mod timeout;
pub mod traits;
pub mod types;

pub use orchestrator::ParseOrchestrator;
pub use registry::ParserRegistry;
pub use traits::LanguageParser;
pub use types::{ClassInfo, FunctionInfo, ImportInfo, ImportKind, ParseResult, ParsedSource, RecoveryInfo};
