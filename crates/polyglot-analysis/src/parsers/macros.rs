//! `define_parser!` macro for the per-language tree-sitter parsers.

/// Define a unit-struct parser backed by [`parse_with_language`].
///
/// ```ignore
/// define_parser!(GoParser, Language::Go, &["go"], tree_sitter_go::LANGUAGE.into());
/// ```
///
/// [`parse_with_language`]: crate::parsers::languages::parse_with_language
#[macro_export]
macro_rules! define_parser {
    ($name:ident, $language:expr, $extensions:expr, $ts_language_fn:expr) => {
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl $name {
            pub fn new() -> Self {
                Self
            }

            fn ts_language(path: &std::path::Path) -> tree_sitter::Language {
                let ext = path.extension().and_then(|e| e.to_str());
                $language
                    .ts_language_for_ext(ext)
                    .unwrap_or_else(|| $ts_language_fn)
            }
        }

        impl $crate::parsers::traits::LanguageParser for $name {
            fn language(&self) -> $crate::scanner::language_detect::Language {
                $language
            }

            fn extensions(&self) -> &[&str] {
                $extensions
            }

            fn parse(
                &self,
                source: &[u8],
                path: &std::path::Path,
            ) -> Result<$crate::parsers::types::ParsedSource, polyglot_core::errors::ParseError> {
                $crate::parsers::languages::parse_with_language(
                    source,
                    path,
                    $language,
                    Self::ts_language(path),
                )
            }
        }
    };
}
