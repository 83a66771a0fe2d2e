//! Configuration system for polyglot.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod analysis_config;
pub mod cache_config;
pub mod duration;
pub mod parser_config;
pub mod polyglot_config;

pub use analysis_config::AnalysisConfig;
pub use cache_config::CacheConfig;
pub use duration::parse_duration;
pub use parser_config::ParserConfig;
pub use polyglot_config::{ConfigOverrides, PolyglotConfig};
