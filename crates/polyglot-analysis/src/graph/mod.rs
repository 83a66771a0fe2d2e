//! Cross-language dependency graph: nodes per parsed file, import edges via
//! a pluggable resolver, and interface edges from detected descriptors.

pub mod builder;
pub mod interfaces;
pub mod resolver;
pub mod types;

pub use builder::{paths_overlap, DependencyGraph, GraphBuilder};
pub use interfaces::{InterfaceContext, InterfaceDetector, InterfaceRegistry};
pub use resolver::{ImportResolver, SubstringResolver};
pub use types::{
    AmbiguousImport, DependencyEdge, DependencyNode, EdgeType, ExportInfo, ExportKind,
    InterfaceDescriptor, InterfaceRole, InterfaceType,
};
