//! Dependency graph construction from per-file parse results.

use std::sync::Arc;
use std::time::Instant;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use polyglot_core::types::collections::{FxHashMap, FxHashSet};

use super::resolver::{ImportResolver, SubstringResolver};
use super::types::{
    AmbiguousImport, DependencyEdge, DependencyNode, ExportInfo, ExportKind,
    InterfaceDescriptor, InterfaceRole, InterfaceType,
};
use crate::parsers::types::ParseResult;
use crate::scanner::types::SourceFile;

/// File-level dependency graph: petgraph storage plus an id index.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub graph: DiGraph<DependencyNode, DependencyEdge>,
    pub node_index: FxHashMap<String, NodeIndex>,
    /// Cross-language subset of the edges, in insertion order.
    pub cross_language_edges: Vec<DependencyEdge>,
    /// Imports that matched several nodes. Resolution picked the first.
    pub ambiguous_imports: Vec<AmbiguousImport>,
}

impl DependencyGraph {
    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.node_index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.graph.edge_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn incoming(&self, id: &str) -> Vec<&DependencyEdge> {
        self.directed(id, Direction::Incoming)
    }

    pub fn outgoing(&self, id: &str) -> Vec<&DependencyEdge> {
        self.directed(id, Direction::Outgoing)
    }

    fn directed(&self, id: &str, direction: Direction) -> Vec<&DependencyEdge> {
        match self.node_index.get(id) {
            Some(&idx) => self
                .graph
                .edges_directed(idx, direction)
                .map(|e| e.weight())
                .collect(),
            None => Vec::new(),
        }
    }

    fn add_node(&mut self, node: DependencyNode) -> NodeIndex {
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        idx
    }

    fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, edge: DependencyEdge) {
        if edge.is_cross_language() {
            self.cross_language_edges.push(edge.clone());
        }
        self.graph.add_edge(source, target, edge);
    }
}

impl Serialize for DependencyGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&DependencyNode> = self.nodes().collect();
        let edges: Vec<&DependencyEdge> = self.edges().collect();
        let mut state = serializer.serialize_struct("DependencyGraph", 4)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &edges)?;
        state.serialize_field("cross_language_edges", &self.cross_language_edges)?;
        state.serialize_field("ambiguous_imports", &self.ambiguous_imports)?;
        state.end()
    }
}

/// Builds a [`DependencyGraph`] with a pluggable import resolver.
#[derive(Clone)]
pub struct GraphBuilder {
    resolver: Arc<dyn ImportResolver>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GraphBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(SubstringResolver))
    }

    pub fn with_resolver(resolver: Arc<dyn ImportResolver>) -> Self {
        Self { resolver }
    }

    /// One node per successful result, import edges through the resolver,
    /// then interface edges between files with matching descriptors.
    pub fn build(
        &self,
        results: &[(SourceFile, ParseResult)],
        interfaces: &[InterfaceDescriptor],
    ) -> DependencyGraph {
        let start = Instant::now();
        let mut graph = DependencyGraph::default();

        let mut parsed: Vec<&(SourceFile, ParseResult)> =
            results.iter().filter(|(_, r)| r.success).collect();
        parsed.sort_by(|a, b| a.0.relative_path.cmp(&b.0.relative_path));
        parsed.dedup_by(|a, b| a.0.relative_path == b.0.relative_path);

        for (file, result) in &parsed {
            graph.add_node(node_from_result(file, result));
        }

        self.add_import_edges(&mut graph);
        add_interface_edges(&mut graph, interfaces);

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            cross_language_edges = graph.cross_language_edges.len(),
            ambiguous_imports = graph.ambiguous_imports.len(),
            graph_build_time = start.elapsed().as_millis() as u64,
            "dependency graph built"
        );
        graph
    }

    fn add_import_edges(&self, graph: &mut DependencyGraph) {
        let ids: Vec<String> = graph.nodes().map(|n| n.id.clone()).collect();
        let mut seen: FxHashSet<(NodeIndex, NodeIndex)> = FxHashSet::default();

        // Node indices follow insertion order, which is the order of `ids`.
        for source_pos in 0..ids.len() {
            let source_idx = NodeIndex::new(source_pos);
            let imports = graph.graph[source_idx].imports.clone();
            for import in &imports {
                let matches: Vec<usize> = self
                    .resolver
                    .resolve(&import.source, &ids)
                    .into_iter()
                    .filter(|&i| i != source_pos)
                    .collect();
                let Some(&first) = matches.first() else {
                    continue;
                };
                if matches.len() > 1 {
                    let ambiguous = AmbiguousImport {
                        file: ids[source_pos].clone(),
                        source: import.source.clone(),
                        chosen: ids[first].clone(),
                        candidates: matches.iter().map(|&i| ids[i].clone()).collect(),
                    };
                    tracing::debug!(
                        file = %ambiguous.file,
                        import = %ambiguous.source,
                        chosen = %ambiguous.chosen,
                        candidates = ambiguous.candidates.len(),
                        "ambiguous import resolved to first match"
                    );
                    graph.ambiguous_imports.push(ambiguous);
                }
                let target_idx = NodeIndex::new(first);
                if !seen.insert((source_idx, target_idx)) {
                    continue;
                }
                let edge = DependencyEdge::import(&graph.graph[source_idx], &graph.graph[target_idx]);
                graph.add_edge(source_idx, target_idx, edge);
            }
        }
    }
}

fn node_from_result(file: &SourceFile, result: &ParseResult) -> DependencyNode {
    let functions = result
        .functions
        .iter()
        .filter(|f| f.is_exported)
        .map(|f| ExportInfo {
            name: f.name.clone(),
            kind: ExportKind::Function,
            line: f.line,
            complexity: Some(f.complexity),
            methods: Vec::new(),
        });
    let classes = result
        .classes
        .iter()
        .filter(|c| c.is_exported)
        .map(|c| ExportInfo {
            name: c.name.clone(),
            kind: ExportKind::Class,
            line: c.line,
            complexity: None,
            methods: c.methods.to_vec(),
        });
    DependencyNode {
        id: file.relative_path.clone(),
        language: result.language,
        exports: functions.chain(classes).collect(),
        imports: result.imports.clone(),
    }
}

/// Connect descriptors in different files that share a type tag or an
/// endpoint path. One edge per file pair and tag; consumer → provider when
/// the roles differ, otherwise in id order.
fn add_interface_edges(graph: &mut DependencyGraph, interfaces: &[InterfaceDescriptor]) {
    let mut known: Vec<(&InterfaceDescriptor, NodeIndex)> = interfaces
        .iter()
        .filter_map(|d| graph.node_index.get(&d.file).map(|&idx| (d, idx)))
        .collect();
    known.sort_by(|a, b| a.0.file.cmp(&b.0.file));

    let mut seen: FxHashSet<(NodeIndex, NodeIndex, InterfaceType)> = FxHashSet::default();
    for i in 0..known.len() {
        for j in (i + 1)..known.len() {
            let (a, a_idx) = known[i];
            let (b, b_idx) = known[j];
            if a_idx == b_idx {
                continue;
            }
            let Some(tag) = shared_tag(a, b) else { continue };
            let (src, dst) = match (a.role, b.role) {
                (InterfaceRole::Provider, InterfaceRole::Consumer) => (b_idx, a_idx),
                _ => (a_idx, b_idx),
            };
            let pair = (src.min(dst), src.max(dst), tag);
            if !seen.insert(pair) {
                continue;
            }
            let edge = DependencyEdge::interface(&graph.graph[src], &graph.graph[dst], tag);
            graph.add_edge(src, dst, edge);
        }
    }
}

/// Tag for an edge between two descriptors, if they correspond at all.
fn shared_tag(a: &InterfaceDescriptor, b: &InterfaceDescriptor) -> Option<InterfaceType> {
    if a.interface_type == b.interface_type {
        return Some(a.interface_type);
    }
    match (a.path.as_deref(), b.path.as_deref()) {
        (Some(pa), Some(pb)) if paths_overlap(pa, pb) => {
            let provider = if b.role == InterfaceRole::Provider { b } else { a };
            Some(provider.interface_type)
        }
        _ => None,
    }
}

/// Segment-wise path comparison. Parameters (`:id`, `{id}`, `<id>`,
/// `${id}`) match anything; the shorter path may match the tail of the
/// longer one to allow mount prefixes.
pub fn paths_overlap(a: &str, b: &str) -> bool {
    let sa = endpoint_segments(a);
    let sb = endpoint_segments(b);
    if sa.is_empty() || sb.is_empty() {
        return sa.is_empty() && sb.is_empty() && !a.trim().is_empty();
    }
    let (short, long) = if sa.len() <= sb.len() { (&sa, &sb) } else { (&sb, &sa) };
    if short.iter().all(|s| s == "*") {
        return false;
    }
    let tail = &long[long.len() - short.len()..];
    short.iter().zip(tail).all(|(x, y)| x == y || x == "*" || y == "*")
}

fn endpoint_segments(path: &str) -> Vec<String> {
    let mut p = path.trim();
    if let Some(pos) = p.find("://") {
        let after = &p[pos + 3..];
        p = after.find('/').map(|i| &after[i..]).unwrap_or("");
    }
    let p = p.split(|c| c == '?' || c == '#').next().unwrap_or("");
    p.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with(':') || s.starts_with('{') || s.starts_with('<') || s.starts_with("${") {
                "*".to_string()
            } else {
                s.to_ascii_lowercase()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::EdgeType;
    use crate::parsers::types::{FunctionInfo, ImportInfo, ImportKind, ParsedSource};
    use crate::scanner::language_detect::Language;
    use polyglot_core::types::collections::BTreeMap;
    use smallvec::SmallVec;

    fn file(path: &str, language: Language) -> SourceFile {
        SourceFile::virtual_file(path, language)
    }

    fn parsed(path: &str, language: Language, imports: &[&str]) -> (SourceFile, ParseResult) {
        let source = ParsedSource {
            functions: vec![FunctionInfo {
                name: "handler".to_string(),
                line: 1,
                complexity: 2,
                is_exported: true,
            }],
            imports: imports
                .iter()
                .map(|s| ImportInfo {
                    source: s.to_string(),
                    kind: ImportKind::Module,
                    names: SmallVec::new(),
                    line: 1,
                })
                .collect(),
            complexity: 2,
            ..Default::default()
        };
        (file(path, language), ParseResult::from_primary(path, language, 0, source))
    }

    fn descriptor(file: &str, language: Language, ty: InterfaceType, role: InterfaceRole, path: Option<&str>) -> InterfaceDescriptor {
        InterfaceDescriptor {
            language,
            file: file.to_string(),
            interface_type: ty,
            framework: "test".to_string(),
            role,
            name: None,
            path: path.map(str::to_string),
            properties: BTreeMap::new(),
        }
    }

    #[test]
    fn import_edges_flag_cross_language() {
        let results = vec![
            parsed("a.py", Language::Python, &["b"]),
            parsed("b.go", Language::Go, &[]),
        ];
        let graph = GraphBuilder::new().build(&results, &[]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edges().next().unwrap();
        assert_eq!((edge.source.as_str(), edge.target.as_str()), ("a.py", "b.go"));
        assert!(edge.is_cross_language());
        assert_eq!(graph.cross_language_edges.len(), 1);
        assert_eq!(graph.node("a.py").unwrap().exports[0].name, "handler");
    }

    #[test]
    fn failed_results_produce_no_node() {
        let mut broken = parsed("c.py", Language::Python, &[]);
        broken.1.success = false;
        let graph = GraphBuilder::new().build(&[broken], &[]);
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn self_imports_and_duplicates_are_skipped() {
        let results = vec![
            parsed("util.ts", Language::TypeScript, &["./util", "./main", "./main"]),
            parsed("main.ts", Language::TypeScript, &[]),
        ];
        let graph = GraphBuilder::new().build(&results, &[]);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.cross_language_edges.is_empty());
    }

    #[test]
    fn ambiguous_import_takes_first_sorted_match_and_is_recorded() {
        let results = vec![
            parsed("web/users.ts", Language::TypeScript, &[]),
            parsed("main.ts", Language::TypeScript, &["users"]),
            parsed("api/users.py", Language::Python, &[]),
        ];
        let graph = GraphBuilder::new().build(&results, &[]);
        assert_eq!(graph.outgoing("main.ts")[0].target, "api/users.py");
        assert_eq!(graph.ambiguous_imports.len(), 1);
        assert_eq!(graph.ambiguous_imports[0].candidates.len(), 2);
    }

    #[test]
    fn interface_edges_point_consumer_to_provider() {
        let results = vec![
            parsed("server.py", Language::Python, &[]),
            parsed("client.ts", Language::TypeScript, &[]),
        ];
        let interfaces = vec![
            descriptor("server.py", Language::Python, InterfaceType::Rest, InterfaceRole::Provider, Some("/users/<id>")),
            descriptor("server.py", Language::Python, InterfaceType::Rest, InterfaceRole::Provider, Some("/health")),
            descriptor("client.ts", Language::TypeScript, InterfaceType::Rest, InterfaceRole::Consumer, Some("/users/42")),
        ];
        let graph = GraphBuilder::new().build(&results, &interfaces);
        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.source, "client.ts");
        assert_eq!(edge.target, "server.py");
        assert_eq!(edge.edge_type, EdgeType::Interface);
        assert_eq!(edge.interface_type, Some(InterfaceType::Rest));
        assert!(edge.is_cross_language());
    }

    #[test]
    fn path_overlap_rules() {
        assert!(paths_overlap("/users/:id", "/users/{userId}"));
        assert!(paths_overlap("http://api.local/v1/users", "/v1/users"));
        assert!(paths_overlap("/users", "/api/users"));
        assert!(!paths_overlap("/users", "/orders"));
        assert!(!paths_overlap("/{id}", "/orders"));
    }

    #[test]
    fn every_edge_matches_endpoint_languages() {
        let results = vec![
            parsed("svc/a.py", Language::Python, &["svc.b", "lib"]),
            parsed("svc/b.py", Language::Python, &["lib"]),
            parsed("lib.rs", Language::Rust, &[]),
            parsed("web/app.js", Language::JavaScript, &["../svc/a"]),
        ];
        let graph = GraphBuilder::new().build(&results, &[]);
        assert!(graph.edge_count() >= 3);
        for edge in graph.edges() {
            let s = graph.node(&edge.source).unwrap();
            let t = graph.node(&edge.target).unwrap();
            assert_eq!(edge.is_cross_language(), s.language != t.language);
        }
    }
}
