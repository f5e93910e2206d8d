//! Rust source scanner.
//!
//! Collects the public methods of inherent `impl` blocks:
//! - `impl Name { ... }` → class `Name` (trait impls are skipped)
//! - `pub fn name(` directly inside the block → one method
//! - `/** ... */` written above the method → its comment, verbatim
//! - a run of `///` lines above the method → rewritten into `/** ... */` form

use super::{MethodDoc, MethodLister};
use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static RE_IMPL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^impl(?:\s*<[^>]*>)?\s+([A-Za-z_]\w*)(?:\s*<[^>]*>)?\s*(?:where\b[^{]*)?(\{.*)?$")
        .unwrap()
});

static RE_PUB_FN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^pub\s+(?:(?:const|async|unsafe)\s+|extern\s+"[^"]*"\s+)*fn\s+([A-Za-z_]\w*)"#)
        .unwrap()
});

/// Pending doc comment waiting for the item it documents.
#[derive(Default)]
enum PendingDoc {
    #[default]
    None,
    Block(Vec<String>),
    Lines(Vec<String>),
}

impl PendingDoc {
    fn render(self) -> String {
        match self {
            PendingDoc::None => String::new(),
            PendingDoc::Block(lines) => lines.join("\n"),
            PendingDoc::Lines(lines) => {
                let mut out = String::from("/**\n");
                for line in lines {
                    out.push_str(" * ");
                    out.push_str(&line);
                    out.push('\n');
                }
                out.push_str(" */");
                out
            }
        }
    }
}

struct ImplScope {
    class: String,
    /// Brace depth outside the block
    depth: i32,
}

/// Method lister backed by Rust source text.
#[derive(Debug, Default, Clone)]
pub struct SourceLister {
    classes: HashMap<String, Vec<MethodDoc>>,
}

impl SourceLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every file in `paths`, in the given order.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut lister = Self::new();
        for path in paths {
            let path = path.as_ref();
            let content = fs::read_to_string(path).map_err(|source| Error::SourceRead {
                path: path.to_path_buf(),
                source,
            })?;
            debug!(path = %path.display(), "scanning source");
            lister.add_source(&content);
        }
        Ok(lister)
    }

    pub fn from_source(content: &str) -> Self {
        let mut lister = Self::new();
        lister.add_source(content);
        lister
    }

    /// Names of every class seen so far.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Scan one source file; methods of a class seen before are appended.
    pub fn add_source(&mut self, content: &str) {
        let mut braces = BraceCounter::default();
        let mut depth: i32 = 0;
        let mut scope: Option<ImplScope> = None;
        let mut awaiting_brace: Option<String> = None;
        let mut pending = PendingDoc::None;
        let mut in_block = false;

        for raw in content.lines() {
            let line = raw.trim();

            // Inside a /** ... */ block
            if in_block {
                if let PendingDoc::Block(ref mut lines) = pending {
                    lines.push(raw.to_string());
                }
                if line.contains("*/") {
                    in_block = false;
                }
                continue;
            }

            // Inside a string or block comment opened on an earlier line
            if !braces.in_code() {
                pending = PendingDoc::None;
                depth += braces.scan(line);
                leave_scope(&mut scope, depth);
                continue;
            }

            if is_doc_block_start(line) {
                pending = PendingDoc::Block(vec![line.to_string()]);
                in_block = !line[3..].contains("*/");
                continue;
            }

            if line.starts_with("///") && !line.starts_with("////") {
                let text = line[3..].strip_prefix(' ').unwrap_or(&line[3..]);
                if let PendingDoc::Lines(ref mut lines) = pending {
                    lines.push(text.to_string());
                } else {
                    pending = PendingDoc::Lines(vec![text.to_string()]);
                }
                continue;
            }

            // Blank lines, attributes and plain comments keep the pending doc
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            if line.starts_with("#[") {
                depth += braces.scan(line);
                continue;
            }

            let inside_impl = scope.as_ref().is_some_and(|s| depth == s.depth + 1);
            if inside_impl {
                if let Some(caps) = RE_PUB_FN.captures(line) {
                    if let Some(ref s) = scope {
                        let name = caps[1].to_string();
                        debug!(class = %s.class, method = %name, "found public method");
                        let comment = std::mem::take(&mut pending).render();
                        self.classes
                            .entry(s.class.clone())
                            .or_default()
                            .push(MethodDoc { name, comment });
                    }
                }
            } else if scope.is_none() {
                if let Some(caps) = RE_IMPL.captures(line) {
                    let class = caps[1].to_string();
                    if caps.get(2).is_some() {
                        scope = Some(ImplScope { class, depth });
                    } else {
                        awaiting_brace = Some(class);
                    }
                } else if let Some(class) = awaiting_brace.take() {
                    if line.starts_with('{') {
                        scope = Some(ImplScope { class, depth });
                    }
                }
            }

            pending = PendingDoc::None;
            depth += braces.scan(line);
            leave_scope(&mut scope, depth);
        }
    }
}

/// `/**` opens a doc comment; `/***` and the empty `/**/` do not.
fn is_doc_block_start(line: &str) -> bool {
    line.starts_with("/**") && !line.starts_with("/***") && !line.starts_with("/**/")
}

fn leave_scope(scope: &mut Option<ImplScope>, depth: i32) {
    if scope.as_ref().is_some_and(|s| depth <= s.depth) {
        *scope = None;
    }
}

impl MethodLister for SourceLister {
    fn list_public_methods(&self, class: &str) -> Result<Vec<MethodDoc>> {
        self.classes
            .get(class)
            .cloned()
            .ok_or_else(|| Error::ClassNotFound(class.to_string()))
    }
}

// -- Brace counting -----------------------------------------------------------

/// Where the scanner is, lexically, at the end of the last line it saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Lex {
    #[default]
    Code,
    Str,
    /// `r#"..."#` closed by a quote and this many `#`
    RawStr(usize),
    /// Nesting depth of `/* ... */`
    BlockComment(u32),
}

/// Counts the braces that are code, carrying string and comment state from
/// one line to the next.
#[derive(Debug, Default)]
struct BraceCounter {
    lex: Lex,
}

impl BraceCounter {
    fn in_code(&self) -> bool {
        self.lex == Lex::Code
    }

    /// Net `{` minus `}` outside literals and comments on this line.
    fn scan(&mut self, line: &str) -> i32 {
        let chars: Vec<char> = line.chars().collect();
        let mut delta = 0;
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            match self.lex {
                Lex::Str => match c {
                    '\\' => i += 1,
                    '"' => self.lex = Lex::Code,
                    _ => {}
                },
                Lex::RawStr(hashes) => {
                    if c == '"' && closes_raw(&chars[i + 1..], hashes) {
                        self.lex = Lex::Code;
                        i += hashes;
                    }
                }
                Lex::BlockComment(level) => {
                    if c == '*' && next == Some('/') {
                        self.lex = if level == 1 {
                            Lex::Code
                        } else {
                            Lex::BlockComment(level - 1)
                        };
                        i += 1;
                    } else if c == '/' && next == Some('*') {
                        self.lex = Lex::BlockComment(level + 1);
                        i += 1;
                    }
                }
                Lex::Code => match c {
                    '/' if next == Some('/') => break,
                    '/' if next == Some('*') => {
                        self.lex = Lex::BlockComment(1);
                        i += 1;
                    }
                    '"' => self.lex = Lex::Str,
                    'r' if !ident_before(&chars, i) => {
                        if let Some(hashes) = raw_string_open(&chars[i + 1..]) {
                            self.lex = Lex::RawStr(hashes);
                            i += hashes + 1;
                        }
                    }
                    '\'' => i = skip_char_literal(&chars, i),
                    '{' => delta += 1,
                    '}' => delta -= 1,
                    _ => {}
                },
            }
            i += 1;
        }
        delta
    }
}

fn ident_before(chars: &[char], i: usize) -> bool {
    i > 0 && {
        let prev = chars[i - 1];
        // `br"..."` is a raw byte string
        let byte_prefix = prev == 'b' && (i < 2 || !is_ident_char(chars[i - 2]));
        is_ident_char(prev) && !byte_prefix
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `#*"` following an `r`: the number of `#`, or `None` when this is not a raw string.
fn raw_string_open(rest: &[char]) -> Option<usize> {
    let hashes = rest.iter().take_while(|&&c| c == '#').count();
    (rest.get(hashes) == Some(&'"')).then_some(hashes)
}

fn closes_raw(rest: &[char], hashes: usize) -> bool {
    rest.len() >= hashes && rest[..hashes].iter().all(|&c| c == '#')
}

/// Index of the last character of a char literal starting at `i`, or `i`
/// itself for a lifetime.
fn skip_char_literal(chars: &[char], i: usize) -> usize {
    match (chars.get(i + 1), chars.get(i + 2)) {
        (Some('\\'), _) => chars
            .get(i + 3..)
            .and_then(|rest| rest.iter().position(|&c| c == '\''))
            .map_or(i, |p| i + 3 + p),
        (Some(_), Some('\'')) => i + 2,
        _ => i,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALC: &str = r#"
use std::fmt;

pub struct Calculator;

impl Calculator {
    /**
     * Add two numbers.
     *
     * @param int $a first
     * @param int $b second
     * @return int sum
     */
    pub fn add(&self, a: i32, b: i32) -> i32 {
        if a > 0 {
            a + b
        } else {
            b + a
        }
    }

    /// Reset the memory.
    /// @param string $reason why
    pub fn reset(&mut self, reason: &str) {}

    fn helper(&self) {}

    pub fn undocumented(&self) {}
}

impl fmt::Display for Calculator {
    /// Not a public method.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", '{')
    }
}
"#;

    #[test]
    fn lists_inherent_pub_fns_in_order() {
        let lister = SourceLister::from_source(CALC);
        let methods = lister.list_public_methods("Calculator").unwrap();
        let names: Vec<_> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["add", "reset", "undocumented"]);
    }

    #[test]
    fn block_comment_is_verbatim() {
        let lister = SourceLister::from_source(CALC);
        let methods = lister.list_public_methods("Calculator").unwrap();
        assert!(methods[0].comment.starts_with("/**\n"));
        assert!(methods[0].comment.contains("@param int $a first"));
        assert!(methods[0].comment.trim_end().ends_with("*/"));
    }

    #[test]
    fn line_docs_become_block() {
        let lister = SourceLister::from_source(CALC);
        let methods = lister.list_public_methods("Calculator").unwrap();
        assert_eq!(
            methods[1].comment,
            "/**\n * Reset the memory.\n * @param string $reason why\n */"
        );
        let op = crate::parser::parse_comment(&methods[1].comment);
        assert_eq!(op.description, "Reset the memory.");
        assert_eq!(op.params[0].ty, "xsd:string");
    }

    #[test]
    fn undocumented_method_has_empty_comment() {
        let lister = SourceLister::from_source(CALC);
        let methods = lister.list_public_methods("Calculator").unwrap();
        assert_eq!(methods[2].comment, "");
    }

    #[test]
    fn trait_impls_are_not_classes() {
        let lister = SourceLister::from_source(CALC);
        assert_eq!(lister.class_names(), ["Calculator"]);
    }

    #[test]
    fn multiple_impl_blocks_append() {
        let mut lister = SourceLister::from_source("impl A {\n    pub fn one() {}\n}\n");
        lister.add_source("impl A\n{\n    pub fn two() {}\n}\n");
        let names: Vec<_> = lister
            .list_public_methods("A")
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["one", "two"]);
    }

    #[test]
    fn unknown_class() {
        let lister = SourceLister::from_source(CALC);
        assert!(matches!(
            lister.list_public_methods("Missing"),
            Err(Error::ClassNotFound(_))
        ));
    }

    fn methods_of(source: &str, class: &str) -> Vec<String> {
        SourceLister::from_source(source)
            .list_public_methods(class)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect()
    }

    #[test]
    fn multi_line_string_with_brace() {
        let source = "impl S {\n    pub fn first(&self) -> &str {\n        \"line one\n{ line two\"\n    }\n\n    pub fn second(&self) {}\n}\n";
        assert_eq!(methods_of(source, "S"), ["first", "second"]);
    }

    #[test]
    fn raw_string_spanning_lines() {
        let source = r####"impl S {
    pub fn first(&self) -> &str {
        r#"}
"quoted" {{
"#
    }

    pub fn second(&self) {}
}
"####;
        assert_eq!(methods_of(source, "S"), ["first", "second"]);
    }

    #[test]
    fn block_comments_hide_braces() {
        let source = "impl S {\n    /* { */\n    pub fn first(&self) {}\n    /*\n    }\n    */\n    pub fn second(&self) {}\n}\n";
        assert_eq!(methods_of(source, "S"), ["first", "second"]);
    }

    #[test]
    fn empty_block_comment_is_not_a_doc() {
        let source = "impl S {\n    /**/\n    pub fn first(&self) {}\n    pub fn second(&self) {}\n}\n";
        let lister = SourceLister::from_source(source);
        let methods = lister.list_public_methods("S").unwrap();
        let names: Vec<_> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(methods[0].comment, "");
    }

    #[test]
    fn brace_counter_ignores_literals() {
        let count = |line: &str| BraceCounter::default().scan(line);
        assert_eq!(count("fn x() {"), 1);
        assert_eq!(count(r#"let s = "{{";"#), 0);
        assert_eq!(count("let c = '{';"), 0);
        assert_eq!(count(r"let c = '\u{7b}';"), 0);
        assert_eq!(count("} // {"), -1);
        assert_eq!(count("f(&self) -> &'a str {"), 1);
        assert_eq!(count(r##"let s = r#"{"#; {"##), 1);
        assert_eq!(count(r##"let s = br"}"; {"##), 1);
        assert_eq!(count("let x = 1; /* { /* } */ { */ }"), -1);
    }

    #[test]
    fn brace_counter_carries_state() {
        let mut braces = BraceCounter::default();
        assert_eq!(braces.scan(r#"let s = "open {"#), 0);
        assert!(!braces.in_code());
        assert_eq!(braces.scan(r#"} still text" ; {"#), 1);
        assert!(braces.in_code());
    }
}
