//! Per-language regex families for heuristic extraction.
//!
//! Function and class patterns capture `name`; import patterns capture
//! `source` and optionally `names`.

use std::sync::LazyLock;

use regex::Regex;

use crate::scanner::language_detect::Language;

/// Regex family for one language.
#[derive(Debug)]
pub struct LanguagePatterns {
    pub functions: Vec<Regex>,
    pub classes: Vec<Regex>,
    pub imports: Vec<Regex>,
}

impl LanguagePatterns {
    fn compile(functions: &[&str], classes: &[&str], imports: &[&str]) -> Self {
        let build = |patterns: &[&str]| -> Vec<Regex> {
            patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
        };
        Self {
            functions: build(functions),
            classes: build(classes),
            imports: build(imports),
        }
    }
}

/// Words that look like callables to the brace-opened patterns but are not.
pub const NON_FUNCTION_NAMES: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "new", "else", "elif", "foreach", "using", "lock",
    "sizeof", "typeof", "match",
];

static PYTHON: LazyLock<LanguagePatterns> = LazyLock::new(|| {
    LanguagePatterns::compile(
        &[r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+(?P<name>\w+)[ \t]*\("],
        &[r"(?m)^[ \t]*class[ \t]+(?P<name>\w+)"],
        &[
            r"(?m)^[ \t]*from[ \t]+(?P<source>[\w.]+)[ \t]+import[ \t]+(?P<names>[^\n#]+)",
            r"(?m)^[ \t]*import[ \t]+(?P<source>[\w.]+)",
        ],
    )
});

static ECMASCRIPT: LazyLock<LanguagePatterns> = LazyLock::new(|| {
    LanguagePatterns::compile(
        &[
            r"(?m)^[ \t]*(?:export[ \t]+)?(?:default[ \t]+)?(?:async[ \t]+)?function\*?[ \t]+(?P<name>\w+)",
            r"(?m)^[ \t]*(?:export[ \t]+)?(?:const|let|var)[ \t]+(?P<name>\w+)[ \t]*(?::[^=\n]+)?=[ \t]*(?:async[ \t]*)?(?:\([^)\n]*\)|\w+)[ \t]*(?::[^=\n]+)?=>",
        ],
        &[r"(?m)^[ \t]*(?:export[ \t]+)?(?:default[ \t]+)?(?:abstract[ \t]+)?(?:class|interface)[ \t]+(?P<name>\w+)"],
        &[
            r#"(?m)^[ \t]*import[ \t]+(?:(?:type[ \t]+)?(?P<names>[^'"\n]+?)[ \t]+from[ \t]+)?['"](?P<source>[^'"\n]+)['"]"#,
            r#"require\(\s*['"](?P<source>[^'"\n]+)['"]\s*\)"#,
        ],
    )
});

static GO: LazyLock<LanguagePatterns> = LazyLock::new(|| {
    LanguagePatterns::compile(
        &[r"(?m)^func[ \t]+(?:\([^)\n]*\)[ \t]*)?(?P<name>\w+)"],
        &[r"(?m)^[ \t]*type[ \t]+(?P<name>\w+)[ \t]+(?:struct|interface)\b"],
        &[
            r#"(?m)^[ \t]*import[ \t]+(?:\w+[ \t]+)?"(?P<source>[^"\n]+)""#,
            r#"(?m)^[ \t]+(?:[\w.]+[ \t]+)?"(?P<source>[^"\n]+)"[ \t]*$"#,
        ],
    )
});

static RUST: LazyLock<LanguagePatterns> = LazyLock::new(|| {
    LanguagePatterns::compile(
        &[r"(?m)^[ \t]*(?:pub(?:\([^)\n]*\))?[ \t]+)?(?:const[ \t]+)?(?:async[ \t]+)?(?:unsafe[ \t]+)?fn[ \t]+(?P<name>\w+)"],
        &[r"(?m)^[ \t]*(?:pub(?:\([^)\n]*\))?[ \t]+)?(?:struct|enum|trait)[ \t]+(?P<name>\w+)"],
        &[r"(?m)^[ \t]*(?:pub[ \t]+)?use[ \t]+(?P<source>[\w:]+)(?:::\{(?P<names>[^}\n]*)\})?"],
    )
});

static JAVA: LazyLock<LanguagePatterns> = LazyLock::new(|| {
    LanguagePatterns::compile(
        &[r"(?m)^[ \t]*(?:(?:public|private|protected|static|final|abstract|synchronized)[ \t]+)*[\w<>\[\],]+[ \t]+(?P<name>\w+)[ \t]*\([^)\n]*\)[ \t]*(?:throws[ \t]+[\w., ]+)?\{"],
        &[r"(?m)^[ \t]*(?:(?:public|private|protected|static|final|abstract)[ \t]+)*(?:class|interface|enum|record)[ \t]+(?P<name>\w+)"],
        &[r"(?m)^[ \t]*import[ \t]+(?:static[ \t]+)?(?P<source>[\w.]+(?:\.\*)?)[ \t]*;"],
    )
});

static KOTLIN: LazyLock<LanguagePatterns> = LazyLock::new(|| {
    LanguagePatterns::compile(
        &[r"(?m)^[ \t]*(?:(?:public|private|internal|protected|override|suspend|inline|open)[ \t]+)*fun[ \t]+(?:<[^>\n]+>[ \t]*)?(?:\w+\.)?(?P<name>\w+)"],
        &[r"(?m)^[ \t]*(?:(?:public|private|internal|data|sealed|open|abstract|enum)[ \t]+)*(?:class|interface|object)[ \t]+(?P<name>\w+)"],
        &[r"(?m)^[ \t]*import[ \t]+(?P<source>[\w.]*\w(?:\.\*)?)"],
    )
});

static RUBY: LazyLock<LanguagePatterns> = LazyLock::new(|| {
    LanguagePatterns::compile(
        &[r"(?m)^[ \t]*def[ \t]+(?:self\.)?(?P<name>[\w?!]+)"],
        &[r"(?m)^[ \t]*(?:class|module)[ \t]+(?P<name>[\w:]+)"],
        &[r#"(?m)^[ \t]*require(?:_relative)?[ \t(]+['"](?P<source>[^'"\n]+)['"]"#],
    )
});

static PHP: LazyLock<LanguagePatterns> = LazyLock::new(|| {
    LanguagePatterns::compile(
        &[r"(?m)^[ \t]*(?:(?:public|private|protected|static|abstract|final)[ \t]+)*function[ \t]+(?P<name>\w+)"],
        &[r"(?m)^[ \t]*(?:(?:abstract|final)[ \t]+)?(?:class|interface|trait)[ \t]+(?P<name>\w+)"],
        &[
            r"(?m)^[ \t]*use[ \t]+(?P<source>[\w\\]+)",
            r#"(?:require|include)(?:_once)?[ \t(]+['"](?P<source>[^'"\n]+)['"]"#,
        ],
    )
});

static CSHARP: LazyLock<LanguagePatterns> = LazyLock::new(|| {
    LanguagePatterns::compile(
        &[r"(?m)^[ \t]*(?:(?:public|private|protected|internal|static|virtual|override|async|abstract|sealed)[ \t]+)+[\w<>\[\],?]+[ \t]+(?P<name>\w+)[ \t]*\("],
        &[r"(?m)^[ \t]*(?:(?:public|private|protected|internal|static|abstract|sealed|partial)[ \t]+)*(?:class|interface|struct|record|enum)[ \t]+(?P<name>\w+)"],
        &[r"(?m)^[ \t]*using[ \t]+(?:static[ \t]+)?(?P<source>[\w.]+)[ \t]*;"],
    )
});

static GENERIC: LazyLock<LanguagePatterns> = LazyLock::new(|| {
    LanguagePatterns::compile(
        &[
            r"(?m)^[ \t]*(?:\w+[ \t]+)*(?:function|def|func|fn|fun)[ \t]+(?P<name>\w+)",
            r"(?m)^[ \t]*[\w<>\[\]]+[ \t]+(?P<name>\w+)[ \t]*\([^)\n]*\)[ \t]*\{",
        ],
        &[r"(?m)^[ \t]*(?:\w+[ \t]+)*(?:class|struct|interface|trait)[ \t]+(?P<name>\w+)"],
        &[r#"(?m)^[ \t]*(?:import|use|using|require|include)[ \t(]+['"]?(?P<source>[\w./:\\@-]+)"#],
    )
});

/// The regex family for `language`.
pub fn patterns_for(language: Language) -> &'static LanguagePatterns {
    match language {
        Language::Python => &PYTHON,
        Language::TypeScript | Language::JavaScript => &ECMASCRIPT,
        Language::Go => &GO,
        Language::Rust => &RUST,
        Language::Java => &JAVA,
        Language::Kotlin => &KOTLIN,
        Language::Ruby => &RUBY,
        Language::Php => &PHP,
        Language::CSharp => &CSHARP,
    }
}

/// Language-agnostic family (function/def/func/fn keywords, brace-opened callables).
pub fn generic_patterns() -> &'static LanguagePatterns {
    &GENERIC
}
