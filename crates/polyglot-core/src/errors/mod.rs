//! Error handling for polyglot.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod cache_error;
pub mod config_error;
pub mod error_code;
pub mod parse_error;
pub mod pipeline_error;
pub mod scan_error;

pub use cache_error::CacheError;
pub use config_error::ConfigError;
pub use error_code::PolyglotErrorCode;
pub use parse_error::ParseError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use scan_error::ScanError;
