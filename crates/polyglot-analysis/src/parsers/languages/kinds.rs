//! Per-language tree-sitter node kinds used by structural extraction.

use crate::scanner::language_detect::Language;

/// Node kinds that drive extraction for one grammar.
#[derive(Debug, Clone, Copy)]
pub struct NodeKinds {
    pub functions: &'static [&'static str],
    pub classes: &'static [&'static str],
    /// Containers whose functions belong to a named type declared elsewhere
    /// (Rust `impl` blocks).
    pub impls: &'static [&'static str],
    pub imports: &'static [&'static str],
    /// Decision points counted toward cyclomatic complexity.
    pub decisions: &'static [&'static str],
}

const JS_FUNCTIONS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "method_definition",
    "arrow_function",
    "function_expression",
];

const JS_DECISIONS: &[&str] = &[
    "if_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "switch_case",
    "catch_clause",
    "ternary_expression",
];

/// Kinds for `language`, or `None` when the language has no grammar.
pub fn node_kinds(language: Language) -> Option<NodeKinds> {
    match language {
        Language::TypeScript => Some(NodeKinds {
            functions: JS_FUNCTIONS,
            classes: &[
                "class_declaration",
                "abstract_class_declaration",
                "interface_declaration",
            ],
            impls: &[],
            imports: &["import_statement", "call_expression"],
            decisions: JS_DECISIONS,
        }),
        Language::JavaScript => Some(NodeKinds {
            functions: JS_FUNCTIONS,
            classes: &["class_declaration"],
            impls: &[],
            imports: &["import_statement", "call_expression"],
            decisions: JS_DECISIONS,
        }),
        Language::Python => Some(NodeKinds {
            functions: &["function_definition"],
            classes: &["class_definition"],
            impls: &[],
            imports: &["import_statement", "import_from_statement"],
            decisions: &[
                "if_statement",
                "elif_clause",
                "for_statement",
                "while_statement",
                "except_clause",
                "conditional_expression",
                "case_clause",
            ],
        }),
        Language::Go => Some(NodeKinds {
            functions: &["function_declaration", "method_declaration", "func_literal"],
            classes: &["type_spec"],
            impls: &[],
            imports: &["import_spec"],
            decisions: &[
                "if_statement",
                "for_statement",
                "expression_case",
                "type_case",
                "communication_case",
            ],
        }),
        Language::Rust => Some(NodeKinds {
            functions: &["function_item", "function_signature_item"],
            classes: &["struct_item", "enum_item", "trait_item"],
            impls: &["impl_item"],
            imports: &["use_declaration"],
            decisions: &[
                "if_expression",
                "match_arm",
                "while_expression",
                "for_expression",
                "loop_expression",
            ],
        }),
        Language::Java => Some(NodeKinds {
            functions: &["method_declaration", "constructor_declaration"],
            classes: &[
                "class_declaration",
                "interface_declaration",
                "enum_declaration",
                "record_declaration",
            ],
            impls: &[],
            imports: &["import_declaration"],
            decisions: &[
                "if_statement",
                "for_statement",
                "enhanced_for_statement",
                "while_statement",
                "do_statement",
                "switch_label",
                "catch_clause",
                "ternary_expression",
            ],
        }),
        Language::Kotlin | Language::Ruby | Language::Php | Language::CSharp => None,
    }
}
