//! Dependency graph node, edge, and interface types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parsers::types::ImportInfo;
use crate::scanner::language_detect::Language;
use polyglot_core::types::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    Import,
    Interface,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Interface => "interface",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Family of a cross-process interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterfaceType {
    Rest,
    Graphql,
    Grpc,
    MessageQueue,
    Websocket,
}

impl InterfaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Graphql => "graphql",
            Self::Grpc => "grpc",
            Self::MessageQueue => "message-queue",
            Self::Websocket => "websocket",
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceRole {
    /// Serves the interface: route handler, servicer, topic producer.
    Provider,
    /// Calls the interface: HTTP client, stub, topic listener.
    Consumer,
}

/// An interface declared or called in one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub language: Language,
    pub file: String,
    pub interface_type: InterfaceType,
    /// Framework hint, e.g. "flask", "express", "tonic".
    pub framework: String,
    pub role: InterfaceRole,
    pub name: Option<String>,
    /// Endpoint path for route-like interfaces.
    pub path: Option<String>,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Class,
}

/// An exported symbol with its signature facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportInfo {
    pub name: String,
    pub kind: ExportKind,
    pub line: u32,
    /// Functions only.
    pub complexity: Option<u32>,
    /// Classes only.
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Relative path of the file.
    pub id: String,
    pub language: Language,
    pub exports: Vec<ExportInfo>,
    pub imports: Vec<ImportInfo>,
}

/// A directed dependency between two nodes.
///
/// `cross_language` is computed from the endpoint languages at construction
/// and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
    cross_language: bool,
    /// Set on interface edges only.
    pub interface_type: Option<InterfaceType>,
}

impl DependencyEdge {
    pub fn import(source: &DependencyNode, target: &DependencyNode) -> Self {
        Self::between(source, target, EdgeType::Import, None)
    }

    pub fn interface(
        source: &DependencyNode,
        target: &DependencyNode,
        interface_type: InterfaceType,
    ) -> Self {
        Self::between(source, target, EdgeType::Interface, Some(interface_type))
    }

    fn between(
        source: &DependencyNode,
        target: &DependencyNode,
        edge_type: EdgeType,
        interface_type: Option<InterfaceType>,
    ) -> Self {
        Self {
            source: source.id.clone(),
            target: target.id.clone(),
            edge_type,
            cross_language: source.language != target.language,
            interface_type,
        }
    }

    pub fn is_cross_language(&self) -> bool {
        self.cross_language
    }
}

/// An import that matched more than one node; the first match was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousImport {
    pub file: String,
    pub source: String,
    pub chosen: String,
    pub candidates: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, language: Language) -> DependencyNode {
        DependencyNode {
            id: id.to_string(),
            language,
            exports: Vec::new(),
            imports: Vec::new(),
        }
    }

    #[test]
    fn cross_language_follows_endpoint_languages() {
        let py = node("a.py", Language::Python);
        let go = node("b.go", Language::Go);
        let py2 = node("c.py", Language::Python);
        assert!(DependencyEdge::import(&py, &go).is_cross_language());
        assert!(!DependencyEdge::import(&py, &py2).is_cross_language());
        assert!(DependencyEdge::interface(&go, &py, InterfaceType::Rest).is_cross_language());
    }

    #[test]
    fn interface_type_serializes_kebab_case() {
        let json = serde_json::to_string(&InterfaceType::MessageQueue).unwrap();
        assert_eq!(json, "\"message-queue\"");
        assert_eq!(InterfaceType::MessageQueue.as_str(), "message-queue");
    }
}
