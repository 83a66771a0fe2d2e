//! Individual repair strategies. Each is a pure function over the raw
//! content and returns `None` when it has nothing to offer.
//!
//! Bracket repairs use naive character counts: string contents and comments are
//! not excluded, so a repaired file is never treated as verified syntax.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::json;
use smallvec::SmallVec;

use super::classifier::{count_char, has_odd_quotes, has_unbalanced_brackets};
use crate::parsers::types::{ClassInfo, FunctionInfo, ParsedSource};
use crate::scanner::language_detect::Language;

/// Bracket pairs repaired by [`bracket_fix`], innermost closer first.
pub const BRACKET_PAIRS: [(char, char); 3] = [('[', ']'), ('(', ')'), ('{', '}')];

/// Content kept by [`content_reduction`].
pub const MAX_REDUCED_BYTES: usize = 64 * 1024;
/// Lines per chunk for [`chunking`].
pub const CHUNK_LINES: usize = 200;
/// Chunks kept by [`chunking`].
pub const MAX_CHUNKS: usize = 10;

/// Named repair strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStrategy {
    BracketFix,
    QuoteFix,
    QuoteEscape,
    SemicolonFix,
    EncodingNormalization,
    ContentReduction,
    Chunking,
    StructureGuess,
    PartialSections,
    PartialLines,
}

impl RecoveryStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BracketFix => "bracket_fix",
            Self::QuoteFix => "quote_fix",
            Self::QuoteEscape => "quote_escape",
            Self::SemicolonFix => "semicolon_fix",
            Self::EncodingNormalization => "encoding_normalization",
            Self::ContentReduction => "content_reduction",
            Self::Chunking => "chunking",
            Self::StructureGuess => "structure_guess",
            Self::PartialSections => "partial_sections",
            Self::PartialLines => "partial_lines",
        }
    }
}

/// What a strategy produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveredOutput {
    /// Repaired or reduced content, to be mined heuristically.
    Content(String),
    /// A structure guessed directly from the content.
    Structure(ParsedSource),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    pub output: RecoveredOutput,
    pub changes: Vec<String>,
    pub confidence: f64,
}

impl StrategyOutcome {
    fn content(content: String, changes: Vec<String>, confidence: f64) -> Self {
        Self {
            output: RecoveredOutput::Content(content),
            changes,
            confidence,
        }
    }
}

/// Wall-clock budget checked inside line loops.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    start: Instant,
    limit: Duration,
}

impl Budget {
    pub fn new(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub fn exceeded(&self) -> bool {
        self.start.elapsed() > self.limit
    }
}

/// Append missing closers or strip excess closers from the end, per pair.
pub fn bracket_fix(text: &str) -> Option<StrategyOutcome> {
    let mut fixed = text.to_string();
    let mut append = String::new();
    let mut changes = Vec::new();

    for (open, close) in BRACKET_PAIRS {
        let opens = count_char(&fixed, open);
        let closes = count_char(&fixed, close);
        if opens > closes {
            let deficit = opens - closes;
            append.extend(std::iter::repeat(close).take(deficit));
            changes.push(format!("appended {deficit} '{close}'"));
        } else if closes > opens {
            let excess = closes - opens;
            remove_last(&mut fixed, close, excess);
            changes.push(format!("removed {excess} trailing '{close}'"));
        }
    }

    if changes.is_empty() {
        return None;
    }
    if !append.is_empty() {
        if !fixed.is_empty() && !fixed.ends_with('\n') {
            fixed.push('\n');
        }
        fixed.push_str(&append);
        fixed.push('\n');
    }
    Some(StrategyOutcome::content(fixed, changes, 0.7))
}

fn remove_last(text: &mut String, c: char, mut n: usize) {
    while n > 0 {
        match text.rfind(c) {
            Some(idx) => {
                text.remove(idx);
                n -= 1;
            }
            None => break,
        }
    }
}

const QUOTES: [char; 2] = ['"', '\''];

/// Characters a closing quote is placed in front of when a line ends
/// inside a string.
const TRAILING_CLOSERS: &[char] = &[';', ')', ']', '}', ','];

fn is_triple_quoted(line: &str) -> bool {
    line.contains("\"\"\"") || line.contains("'''")
}

/// The quote left open at the end of `line` and its byte offset.
///
/// Quotes inside a string of the other kind are content, and a backslash
/// escapes the next character.
fn open_quote_at_eol(line: &str) -> Option<(char, usize)> {
    let mut open: Option<(char, usize)> = None;
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if !QUOTES.contains(&c) {
            continue;
        }
        match open {
            None => open = Some((c, idx)),
            Some((q, _)) if q == c => open = None,
            Some(_) => {}
        }
    }
    open
}

/// Per quote kind, the line to repair: the last line left open by that
/// quote, and only when an odd number of lines are, so that the file as a
/// whole holds an unmatched quote.
fn unmatched_quote_lines(lines: &[&str]) -> Vec<(usize, usize)> {
    let mut targets = Vec::new();
    for quote in QUOTES {
        let open_lines: Vec<(usize, usize)> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !is_triple_quoted(line))
            .filter_map(|(idx, line)| match open_quote_at_eol(line) {
                Some((q, pos)) if q == quote => Some((idx, pos)),
                _ => None,
            })
            .collect();
        if open_lines.len() % 2 == 1 {
            targets.extend(open_lines.last().copied());
        }
    }
    targets
}

/// Close the unterminated string on the line that leaves the file with an
/// unmatched quote, in front of any trailing closers.
pub fn quote_fix(text: &str) -> Option<StrategyOutcome> {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let borrowed: Vec<&str> = text.lines().collect();
    let mut changes = Vec::new();

    for (idx, open_pos) in unmatched_quote_lines(&borrowed) {
        let line = &lines[idx];
        let quote = line[open_pos..].chars().next()?;
        let body_start = open_pos + quote.len_utf8();
        let body = line[body_start..].trim_end();
        let inner = body.trim_end_matches(TRAILING_CLOSERS);
        let tail = &body[inner.len()..];
        let repaired = format!("{}{inner}{quote}{tail}", &line[..body_start]);
        lines[idx] = repaired;
        changes.push(format!("closed {quote} on line {}", idx + 1));
    }

    if changes.is_empty() {
        return None;
    }
    Some(StrategyOutcome::content(join_lines(&lines, text), changes, 0.65))
}

/// Escape the opening quote of the unterminated string that leaves the
/// file with an unmatched quote.
pub fn quote_escape(text: &str) -> Option<StrategyOutcome> {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let borrowed: Vec<&str> = text.lines().collect();
    let mut changes = Vec::new();

    for (idx, open_pos) in unmatched_quote_lines(&borrowed) {
        let quote = lines[idx][open_pos..].chars().next()?;
        lines[idx].insert(open_pos, '\\');
        changes.push(format!("escaped {quote} on line {}", idx + 1));
    }

    if changes.is_empty() {
        return None;
    }
    Some(StrategyOutcome::content(join_lines(&lines, text), changes, 0.6))
}

const STATEMENT_TERMINATED: &[char] = &[
    ';', '{', '}', '(', '[', ',', ':', '=', '+', '-', '*', '/', '\\', '|', '&', '.', '>', '<', '?',
];
const BLOCK_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "switch", "do", "try", "catch", "finally", "function", "class",
    "interface", "namespace", "case", "default",
];

/// Terminate statement-looking lines with `;` in semicolon languages.
pub fn semicolon_fix(text: &str, language: Language, budget: &Budget) -> Option<StrategyOutcome> {
    if !matches!(
        language,
        Language::TypeScript | Language::JavaScript | Language::Java | Language::CSharp | Language::Php
    ) {
        return None;
    }

    let mut changes = Vec::new();
    let mut lines = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if budget.exceeded() {
            return None;
        }
        let trimmed = line.trim();
        let needs_terminator = !trimmed.is_empty()
            && !trimmed.starts_with("//")
            && !trimmed.starts_with("/*")
            && !trimmed.starts_with('*')
            && !trimmed.starts_with('#')
            && !trimmed.starts_with('@')
            && !trimmed.ends_with(STATEMENT_TERMINATED)
            && !BLOCK_KEYWORDS
                .iter()
                .any(|kw| trimmed.starts_with(kw) && !trimmed[kw.len()..].starts_with(|c: char| c.is_alphanumeric() || c == '_'));
        if needs_terminator {
            lines.push(format!("{};", line.trim_end()));
            changes.push(format!("added ';' on line {}", idx + 1));
        } else {
            lines.push(line.to_string());
        }
    }

    if changes.is_empty() {
        return None;
    }
    Some(StrategyOutcome::content(join_lines(&lines, text), changes, 0.6))
}

/// Lossy UTF-8 decode, BOM strip, CRLF → LF, drop control characters.
pub fn encoding_normalization(bytes: &[u8]) -> Option<StrategyOutcome> {
    let mut changes = Vec::new();
    let decoded = String::from_utf8_lossy(bytes);
    if matches!(decoded, Cow::Owned(_)) {
        changes.push("replaced invalid UTF-8 sequences".to_string());
    }
    let mut text = decoded.into_owned();

    if let Some(rest) = text.strip_prefix('\u{feff}') {
        text = rest.to_string();
        changes.push("stripped byte-order mark".to_string());
    }
    if text.contains("\r\n") {
        text = text.replace("\r\n", "\n");
        changes.push("normalized CRLF line endings".to_string());
    }
    let before = text.len();
    text.retain(|c| c != '\u{fffd}' && (c == '\n' || c == '\t' || !c.is_control()));
    if text.len() != before {
        changes.push("removed control and replacement characters".to_string());
    }

    if changes.is_empty() {
        return None;
    }
    Some(StrategyOutcome::content(text, changes, 0.75))
}

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
        || trimmed.starts_with("--")
        || (trimmed.starts_with('#') && !trimmed.starts_with("#[") && !trimmed.starts_with("#!"))
}

/// Drop comments and blank lines, then truncate at a line boundary.
pub fn content_reduction(text: &str) -> Option<StrategyOutcome> {
    let mut dropped = 0usize;
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            let keep = !trimmed.is_empty() && !is_comment_line(trimmed);
            if !keep {
                dropped += 1;
            }
            keep
        })
        .collect();

    let mut reduced = kept.join("\n");
    let mut changes = Vec::new();
    if dropped > 0 {
        changes.push(format!("dropped {dropped} comment or blank lines"));
    }
    if reduced.len() > MAX_REDUCED_BYTES {
        let cut = reduced[..floor_char_boundary(&reduced, MAX_REDUCED_BYTES)]
            .rfind('\n')
            .unwrap_or(0);
        reduced.truncate(cut);
        changes.push(format!("truncated to {} bytes", reduced.len()));
    }

    if reduced.len() >= text.len() || reduced.trim().is_empty() {
        return None;
    }
    Some(StrategyOutcome::content(reduced, changes, 0.35))
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Keep only the leading chunks of a large file.
pub fn chunking(text: &str, budget: &Budget) -> Option<StrategyOutcome> {
    let lines: Vec<&str> = text.lines().collect();
    let total_chunks = lines.len().div_ceil(CHUNK_LINES);
    if total_chunks <= 1 {
        return None;
    }

    let mut kept = Vec::new();
    for chunk in lines.chunks(CHUNK_LINES).take(MAX_CHUNKS) {
        if budget.exceeded() {
            break;
        }
        kept.push(chunk.join("\n"));
    }
    if kept.is_empty() {
        return None;
    }
    let changes = vec![format!(
        "split into {total_chunks} chunks of {CHUNK_LINES} lines; kept {}",
        kept.len()
    )];
    Some(StrategyOutcome::content(kept.join("\n"), changes, 0.3))
}

const GUESS_FUNCTION_KEYWORDS: &[&str] = &["def", "function", "func", "fn", "fun", "async def"];
const GUESS_CLASS_KEYWORDS: &[&str] = &["class", "struct", "interface", "trait", "type"];

/// Line-prefix keyword scan producing a structure without any parsing.
pub fn structure_guess(text: &str) -> Option<StrategyOutcome> {
    let mut functions = Vec::new();
    let mut classes = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line
            .trim_start()
            .trim_start_matches("export ")
            .trim_start_matches("pub ")
            .trim_start_matches("public ");
        let line_no = idx as u32 + 1;
        if let Some(name) = keyword_name(trimmed, GUESS_FUNCTION_KEYWORDS) {
            functions.push(FunctionInfo {
                name,
                line: line_no,
                complexity: 1,
                is_exported: false,
            });
        } else if let Some(name) = keyword_name(trimmed, GUESS_CLASS_KEYWORDS) {
            classes.push(ClassInfo {
                name,
                methods: SmallVec::new(),
                line: line_no,
                is_exported: false,
            });
        }
    }

    if functions.is_empty() && classes.is_empty() {
        return None;
    }
    let complexity = 1 + functions.len() as u32 + 2 * classes.len() as u32;
    let changes = vec![format!(
        "guessed {} functions and {} classes from line prefixes",
        functions.len(),
        classes.len()
    )];
    Some(StrategyOutcome {
        output: RecoveredOutput::Structure(ParsedSource {
            functions,
            classes,
            imports: Vec::new(),
            complexity,
            ast: Some(json!({ "kind": "guess" })),
        }),
        changes,
        confidence: 0.2,
    })
}

fn keyword_name(line: &str, keywords: &[&str]) -> Option<String> {
    keywords.iter().find_map(|kw| {
        let rest = line.strip_prefix(kw)?.strip_prefix([' ', '\t'])?;
        let name: String = rest
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        (!name.is_empty()).then_some(name)
    })
}

/// Keep blank-line separated sections that are balanced on their own.
pub fn partial_sections(text: &str, budget: &Budget) -> Option<StrategyOutcome> {
    let mut kept = Vec::new();
    let mut dropped = 0usize;
    for section in text.split("\n\n") {
        if budget.exceeded() {
            break;
        }
        if section.trim().is_empty() {
            continue;
        }
        if has_unbalanced_brackets(section) || has_odd_quotes(section) {
            dropped += 1;
        } else {
            kept.push(section);
        }
    }
    if kept.is_empty() {
        return None;
    }
    let changes = vec![format!("kept {} sections, dropped {dropped}", kept.len())];
    Some(StrategyOutcome::content(kept.join("\n\n"), changes, 0.4))
}

/// Keep lines without unmatched quotes or stray closers.
pub fn partial_lines(text: &str, budget: &Budget) -> Option<StrategyOutcome> {
    let mut kept = Vec::new();
    let mut dropped = 0usize;
    for line in text.lines() {
        if budget.exceeded() {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let stray_closer = BRACKET_PAIRS
            .iter()
            .any(|&(open, close)| count_char(line, close) > count_char(line, open) && !line.trim().starts_with(close));
        if has_odd_quotes(line) || stray_closer {
            dropped += 1;
        } else {
            kept.push(line);
        }
    }
    if kept.is_empty() {
        return None;
    }
    let changes = vec![format!("kept {} lines, dropped {dropped}", kept.len())];
    Some(StrategyOutcome::content(kept.join("\n"), changes, 0.3))
}

/// Rejoin lines, preserving a trailing newline when the input had one.
fn join_lines(lines: &[String], original: &str) -> String {
    let mut joined = lines.join("\n");
    if original.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(outcome: &StrategyOutcome) -> &str {
        match &outcome.output {
            RecoveredOutput::Content(c) => c,
            RecoveredOutput::Structure(_) => panic!("expected content"),
        }
    }

    #[test]
    fn bracket_fix_appends_missing_closers() {
        let outcome = bracket_fix("function f() {\n  if (x) {\n    call(\n").unwrap();
        let fixed = content(&outcome);
        assert!(!has_unbalanced_brackets(fixed));
        assert_eq!(outcome.confidence, 0.7);
        assert_eq!(outcome.changes.len(), 2);
    }

    #[test]
    fn bracket_fix_strips_excess_closers_from_end() {
        let outcome = bracket_fix("fn a() {}\n}\n").unwrap();
        assert_eq!(content(&outcome), "fn a() {}\n\n");
    }

    #[test]
    fn bracket_fix_declines_balanced_input() {
        assert!(bracket_fix("{ [ ( ) ] }").is_none());
    }

    #[test]
    fn quote_fix_closes_line() {
        let outcome = quote_fix("x = \"abc;\ny = 'ok'\n").unwrap();
        assert_eq!(content(&outcome), "x = \"abc\";\ny = 'ok'\n");
        assert_eq!(outcome.changes, vec!["closed \" on line 1".to_string()]);
    }

    #[test]
    fn quote_fix_ignores_apostrophes_inside_double_quoted_strings() {
        assert!(quote_fix("a = \"it's\"\nb = \"he's\"\n").is_none());
        assert!(quote_escape("a = \"it's\"\n").is_none());
    }

    #[test]
    fn quote_fix_closes_before_trailing_closers() {
        let outcome = quote_fix("call(\"abc);\n").unwrap();
        assert_eq!(content(&outcome), "call(\"abc\");\n");
    }

    #[test]
    fn quote_fix_repairs_only_the_line_left_open() {
        // Two open lines pair up; the file has no unmatched quote.
        assert!(quote_fix("x = \"a\nz = \"c\n").is_none());
        let outcome = quote_fix("x = \"a\"\nz = 'it\"s\n").unwrap();
        assert_eq!(content(&outcome), "x = \"a\"\nz = 'it\"s'\n");
        assert_eq!(outcome.changes, vec!["closed ' on line 2".to_string()]);
    }

    #[test]
    fn quote_escape_escapes_last_quote() {
        let outcome = quote_escape("say \"hi\n").unwrap();
        assert_eq!(content(&outcome), "say \\\"hi\n");
    }

    #[test]
    fn semicolon_fix_only_in_semicolon_languages() {
        let budget = Budget::new(Duration::from_millis(50));
        assert!(semicolon_fix("x = 1\n", Language::Python, &budget).is_none());
        let outcome = semicolon_fix("let x = 1\nif (x) {\n}\n", Language::JavaScript, &budget).unwrap();
        assert_eq!(content(&outcome), "let x = 1;\nif (x) {\n}\n");
    }

    #[test]
    fn encoding_normalization_cleans_bytes() {
        let outcome = encoding_normalization(b"\xef\xbb\xbfdef f():\r\n    pass\xff\r\n").unwrap();
        assert_eq!(content(&outcome), "def f():\n    pass\n");
        assert!(encoding_normalization(b"clean\n").is_none());
    }

    #[test]
    fn content_reduction_drops_comments() {
        let outcome = content_reduction("# header\n\nimport os\n// note\nx = 1\n").unwrap();
        assert_eq!(content(&outcome), "import os\nx = 1");
    }

    #[test]
    fn chunking_needs_more_than_one_chunk() {
        let budget = Budget::new(Duration::from_millis(50));
        assert!(chunking("a\nb\n", &budget).is_none());
        let big: String = (0..450).map(|i| format!("line{i}\n")).collect();
        let outcome = chunking(&big, &budget).unwrap();
        assert_eq!(content(&outcome).lines().count(), 450);
    }

    #[test]
    fn structure_guess_finds_keywords() {
        let outcome = structure_guess("class A:\n    def run(self):\nexport function go() {\n").unwrap();
        match outcome.output {
            RecoveredOutput::Structure(parsed) => {
                assert_eq!(parsed.classes.len(), 1);
                assert_eq!(parsed.functions.len(), 2);
                assert_eq!(parsed.complexity, 1 + 2 + 2);
            }
            RecoveredOutput::Content(_) => panic!("expected structure"),
        }
        assert!(structure_guess("x = 1\n").is_none());
    }

    #[test]
    fn partial_sections_keep_balanced_sections() {
        let budget = Budget::new(Duration::from_millis(50));
        let outcome = partial_sections("def ok():\n    pass\n\ndef bad(:\n    pass\n", &budget).unwrap();
        assert_eq!(content(&outcome), "def ok():\n    pass");
    }

    #[test]
    fn partial_lines_drop_broken_lines() {
        let budget = Budget::new(Duration::from_millis(50));
        let outcome = partial_lines("def ok():\nx = \"open\nreturn a)\n", &budget).unwrap();
        assert_eq!(content(&outcome), "def ok():");
    }
}
