//! Core types, errors, configuration, events, and tracing for the polyglot engine.
//!
//! Everything here is shared by the analysis crate and by embedders; nothing
//! in this crate parses source code.

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod types;
