//! Scanner subsystem: language detection, content hashing, default discovery.

pub mod hasher;
pub mod language_detect;
pub mod types;
pub mod walker;

pub use language_detect::Language;
pub use types::{DiscoveryStats, SourceFile};
pub use walker::{discover_files, discover_files_with_stats};
