//! Structural extraction (functions, classes, imports, complexity) from a
//! clean tree-sitter tree.

use serde_json::json;
use smallvec::SmallVec;
use tree_sitter::Node;

use super::languages::kinds::NodeKinds;
use super::types::{ClassInfo, FunctionInfo, ImportInfo, ImportKind, ParsedSource};
use crate::scanner::language_detect::Language;

/// Where a function being visited belongs.
enum Owner {
    None,
    Class(usize),
    Impl(String),
}

struct Extractor<'s> {
    source: &'s [u8],
    language: Language,
    kinds: NodeKinds,
    functions: Vec<FunctionInfo>,
    classes: Vec<ClassInfo>,
    imports: Vec<ImportInfo>,
    /// Methods declared outside their type (Rust impl blocks, Go receivers).
    pending_methods: Vec<(String, FunctionInfo)>,
}

/// Extract structure from `root`. The tree must be free of ERROR nodes.
pub fn extract(root: Node<'_>, source: &[u8], language: Language, kinds: NodeKinds) -> ParsedSource {
    let mut extractor = Extractor {
        source,
        language,
        kinds,
        functions: Vec::new(),
        classes: Vec::new(),
        imports: Vec::new(),
        pending_methods: Vec::new(),
    };
    extractor.walk(root, &Owner::None, false);
    extractor.attach_pending_methods();

    let complexity = 1 + count_kinds(root, kinds.decisions);
    let mut functions = extractor.functions;
    functions.sort_by_key(|f| f.line);

    ParsedSource {
        functions,
        classes: extractor.classes,
        imports: extractor.imports,
        complexity,
        ast: Some(summarize(root)),
    }
}

impl<'s> Extractor<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.source).unwrap_or("")
    }

    fn walk(&mut self, node: Node<'_>, owner: &Owner, in_function: bool) {
        let kind = node.kind();

        if self.kinds.classes.contains(&kind) {
            if let Some(name) = self.class_name(node) {
                let is_exported = self.is_exported(node, &name);
                self.classes.push(ClassInfo {
                    name,
                    methods: SmallVec::new(),
                    line: line_of(node),
                    is_exported,
                });
                let idx = self.classes.len() - 1;
                self.walk_children(node, &Owner::Class(idx), false);
                return;
            }
        }

        if self.kinds.impls.contains(&kind) {
            if let Some(type_node) = node.child_by_field_name("type") {
                let type_name = base_type_name(self.text(type_node));
                self.walk_children(node, &Owner::Impl(type_name), false);
                return;
            }
        }

        if self.kinds.functions.contains(&kind) && !in_function {
            if let Some(name) = self.function_name(node) {
                let info = FunctionInfo {
                    is_exported: self.is_exported(node, &name),
                    name,
                    line: line_of(node),
                    complexity: 1 + count_kinds(node, self.kinds.decisions),
                };
                match owner {
                    Owner::Class(idx) => self.classes[*idx].methods.push(info.name),
                    Owner::Impl(type_name) => self.pending_methods.push((type_name.clone(), info)),
                    Owner::None => match self.receiver_type(node) {
                        Some(type_name) => self.pending_methods.push((type_name, info)),
                        None => self.functions.push(info),
                    },
                }
                self.walk_children(node, &Owner::None, true);
                return;
            }
        }

        if self.kinds.imports.contains(&kind) {
            self.collect_import(node);
        }

        self.walk_children(node, owner, in_function);
    }

    fn walk_children(&mut self, node: Node<'_>, owner: &Owner, in_function: bool) {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        for child in children {
            self.walk(child, owner, in_function);
        }
    }

    fn attach_pending_methods(&mut self) {
        for (owner, info) in std::mem::take(&mut self.pending_methods) {
            match self.classes.iter_mut().find(|c| c.name == owner) {
                Some(class) => class.methods.push(info.name),
                None => self.functions.push(info),
            }
        }
    }

    fn class_name(&self, node: Node<'_>) -> Option<String> {
        if self.language == Language::Go {
            let ty = node.child_by_field_name("type")?;
            if !matches!(ty.kind(), "struct_type" | "interface_type") {
                return None;
            }
        }
        let name = node.child_by_field_name("name")?;
        Some(self.text(name).to_string())
    }

    fn function_name(&self, node: Node<'_>) -> Option<String> {
        if let Some(name) = node.child_by_field_name("name") {
            return Some(self.text(name).to_string());
        }
        // Anonymous JS/TS functions take the name they are bound to.
        let parent = node.parent()?;
        let binding = match parent.kind() {
            "variable_declarator" => parent.child_by_field_name("name")?,
            "pair" => parent.child_by_field_name("key")?,
            _ => return None,
        };
        Some(self.text(binding).to_string())
    }

    /// Go method receiver type: `(s *Server)` → `Server`.
    fn receiver_type(&self, node: Node<'_>) -> Option<String> {
        if node.kind() != "method_declaration" || self.language != Language::Go {
            return None;
        }
        let receiver = node.child_by_field_name("receiver")?;
        let text = self.text(receiver).trim_matches(|c| c == '(' || c == ')');
        let last = text.split_whitespace().last()?;
        Some(base_type_name(last))
    }

    fn is_exported(&self, node: Node<'_>, name: &str) -> bool {
        match self.language {
            Language::TypeScript | Language::JavaScript => {
                let mut current = node.parent();
                let mut depth = 0;
                while let Some(parent) = current {
                    if parent.kind() == "export_statement" {
                        return true;
                    }
                    if parent.kind() == "program" || depth >= 4 {
                        break;
                    }
                    depth += 1;
                    current = parent.parent();
                }
                false
            }
            Language::Python => !name.starts_with('_'),
            Language::Go => name.chars().next().is_some_and(char::is_uppercase),
            Language::Rust => has_child_kind(node, "visibility_modifier"),
            Language::Java => {
                let mut cursor = node.walk();
                let exported = node
                    .children(&mut cursor)
                    .any(|c| c.kind() == "modifiers" && self.text(c).contains("public"));
                exported
            }
            _ => false,
        }
    }

    fn collect_import(&mut self, node: Node<'_>) {
        let line = line_of(node);
        match (self.language, node.kind()) {
            (Language::TypeScript | Language::JavaScript, "import_statement") => {
                let Some(source) = node.child_by_field_name("source") else {
                    return;
                };
                let mut names: SmallVec<[String; 4]> = SmallVec::new();
                let mut kind = ImportKind::SideEffect;
                let mut cursor = node.walk();
                for clause in node.children(&mut cursor).filter(|c| c.kind() == "import_clause") {
                    kind = ImportKind::Named;
                    let mut inner = clause.walk();
                    for part in clause.children(&mut inner) {
                        match part.kind() {
                            "identifier" => names.push(self.text(part).to_string()),
                            "named_imports" => {
                                let mut spec_cursor = part.walk();
                                for spec in part
                                    .children(&mut spec_cursor)
                                    .filter(|s| s.kind() == "import_specifier")
                                {
                                    if let Some(name) = spec.child_by_field_name("name") {
                                        names.push(self.text(name).to_string());
                                    }
                                }
                            }
                            "namespace_import" => kind = ImportKind::Wildcard,
                            _ => {}
                        }
                    }
                }
                self.imports.push(ImportInfo {
                    source: strip_quotes(self.text(source)),
                    kind,
                    names,
                    line,
                });
            }
            (Language::TypeScript | Language::JavaScript, "call_expression") => {
                let Some(function) = node.child_by_field_name("function") else {
                    return;
                };
                if !matches!(self.text(function), "require" | "import") {
                    return;
                }
                let Some(args) = node.child_by_field_name("arguments") else {
                    return;
                };
                let Some(first) = args.named_child(0).filter(|a| a.kind() == "string") else {
                    return;
                };
                self.imports.push(ImportInfo {
                    source: strip_quotes(self.text(first)),
                    kind: ImportKind::Module,
                    names: SmallVec::new(),
                    line,
                });
            }
            (Language::Python, "import_statement") => {
                let mut cursor = node.walk();
                let modules: Vec<Node<'_>> = node.children_by_field_name("name", &mut cursor).collect();
                for module in modules {
                    let target = if module.kind() == "aliased_import" {
                        module.child_by_field_name("name").unwrap_or(module)
                    } else {
                        module
                    };
                    self.imports.push(ImportInfo {
                        source: self.text(target).to_string(),
                        kind: ImportKind::Module,
                        names: SmallVec::new(),
                        line,
                    });
                }
            }
            (Language::Python, "import_from_statement") => {
                let Some(module) = node.child_by_field_name("module_name") else {
                    return;
                };
                let wildcard = has_child_kind(node, "wildcard_import");
                let mut cursor = node.walk();
                let names: SmallVec<[String; 4]> = node
                    .children_by_field_name("name", &mut cursor)
                    .map(|n| {
                        let target = if n.kind() == "aliased_import" {
                            n.child_by_field_name("name").unwrap_or(n)
                        } else {
                            n
                        };
                        self.text(target).to_string()
                    })
                    .collect();
                self.imports.push(ImportInfo {
                    source: self.text(module).to_string(),
                    kind: if wildcard { ImportKind::Wildcard } else { ImportKind::Named },
                    names,
                    line,
                });
            }
            (Language::Go, "import_spec") => {
                let Some(path) = node.child_by_field_name("path") else {
                    return;
                };
                let names = node
                    .child_by_field_name("name")
                    .map(|n| SmallVec::from_elem(self.text(n).to_string(), 1))
                    .unwrap_or_default();
                self.imports.push(ImportInfo {
                    source: strip_quotes(self.text(path)),
                    kind: ImportKind::Module,
                    names,
                    line,
                });
            }
            (Language::Rust, "use_declaration") => {
                let Some(argument) = node.child_by_field_name("argument") else {
                    return;
                };
                self.imports.push(split_path_import(self.text(argument), "::", line));
            }
            (Language::Java, "import_declaration") => {
                let text = self
                    .text(node)
                    .trim()
                    .trim_start_matches("import")
                    .trim()
                    .trim_start_matches("static")
                    .trim()
                    .trim_end_matches(';')
                    .trim();
                self.imports.push(split_path_import(text, ".", line));
            }
            _ => {}
        }
    }
}

/// Split `a::b::{c, d}` / `a.b.C` / `a.b.*` into source + names.
fn split_path_import(path: &str, sep: &str, line: u32) -> ImportInfo {
    let path: String = path.split_whitespace().collect();
    let glob_suffix = format!("{sep}*");
    if let Some(prefix) = path.strip_suffix(&glob_suffix) {
        return ImportInfo {
            source: prefix.to_string(),
            kind: ImportKind::Wildcard,
            names: SmallVec::new(),
            line,
        };
    }
    let group_open = format!("{sep}{{");
    if let Some(idx) = path.find(&group_open) {
        let names = path[idx + group_open.len()..]
            .trim_end_matches('}')
            .split(',')
            .filter(|n| !n.is_empty())
            .map(|n| n.to_string())
            .collect();
        return ImportInfo {
            source: path[..idx].to_string(),
            kind: ImportKind::Named,
            names,
            line,
        };
    }
    let names = path
        .rsplit(sep)
        .next()
        .filter(|n| !n.is_empty())
        .map(|n| SmallVec::from_elem(n.to_string(), 1))
        .unwrap_or_default();
    ImportInfo {
        source: path.clone(),
        kind: ImportKind::Named,
        names,
        line,
    }
}

fn strip_quotes(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`').to_string()
}

/// `&mut Foo<T>` / `crate::a::Foo` / `*Server[T]` → `Foo` / `Foo` / `Server`.
fn base_type_name(text: &str) -> String {
    let head = text.split(['<', '[']).next().unwrap_or(text);
    let last = head.rsplit("::").next().unwrap_or(head);
    last.trim_start_matches(['&', '*']).trim_start_matches("mut ").trim().to_string()
}

fn line_of(node: Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}

fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

fn count_kinds(node: Node<'_>, kinds: &[&str]) -> u32 {
    let mut count = u32::from(kinds.contains(&node.kind()));
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        count += count_kinds(child, kinds);
    }
    count
}

fn summarize(root: Node<'_>) -> serde_json::Value {
    let mut cursor = root.walk();
    let top_level: Vec<&'static str> = root.named_children(&mut cursor).map(|n| n.kind()).take(64).collect();
    json!({
        "root": root.kind(),
        "node_count": root.descendant_count(),
        "end_line": root.end_position().row + 1,
        "top_level": top_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_rust_group_import() {
        let info = split_path_import("std::collections::{HashMap, HashSet}", "::", 1);
        assert_eq!(info.source, "std::collections");
        assert_eq!(info.kind, ImportKind::Named);
        assert_eq!(info.names.as_slice(), ["HashMap".to_string(), "HashSet".to_string()]);
    }

    #[test]
    fn splits_java_wildcard_import() {
        let info = split_path_import("java.util.*", ".", 3);
        assert_eq!(info.source, "java.util");
        assert_eq!(info.kind, ImportKind::Wildcard);
    }

    #[test]
    fn base_type_strips_generics_and_pointers() {
        assert_eq!(base_type_name("Foo<T>"), "Foo");
        assert_eq!(base_type_name("crate::model::User"), "User");
        assert_eq!(base_type_name("*Server"), "Server");
    }
}
