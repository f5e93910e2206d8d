//! Documentation comment parser.
//!
//! Turns one `/** ... */` block into an [`OperationSpec`]:
//! - `@param <type> $<name> [description]` → [`ParamSpec`]
//! - `@return <type> [description]` → [`ReturnSpec`]
//! - any other `@tag` line is dropped
//! - everything else is kept, in order, as the free-text description

use super::types::normalize_type;
use crate::model::{OperationSpec, ParamSpec, ReturnSpec};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

// -- Regex patterns -----------------------------------------------------------

static RE_LEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\*\s*").unwrap());

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@(\S+)\s*(.*)$").unwrap());

static RE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+\$(\S+)(?:\s+(.*))?$").unwrap());

static RE_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S*)(?:\s+(.*))?$").unwrap());

// -- Tags ---------------------------------------------------------------------

/// A recognized tag line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Param(ParamSpec),
    Return(ReturnSpec),
}

/// Parse the text following `@<name>` on a tag line.
///
/// Returns `None` for unrecognized tags and for a `@param` without a `$name`.
/// A bare `@return` still yields a return entry, with an empty type token.
pub fn parse_tag(name: &str, text: &str) -> Option<Tag> {
    let text = text.trim_end();
    match name {
        "param" => {
            let caps = RE_PARAM.captures(text)?;
            Some(Tag::Param(ParamSpec {
                name: caps[2].to_string(),
                ty: normalize_type(&caps[1]),
                doc: non_empty(caps.get(3).map(|m| m.as_str())),
            }))
        }
        "return" => {
            let caps = RE_RETURN.captures(text.trim_start())?;
            Some(Tag::Return(ReturnSpec {
                ty: normalize_type(caps.get(1).map_or("", |m| m.as_str())),
                doc: non_empty(caps.get(2).map(|m| m.as_str())),
            }))
        }
        _ => None,
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

// -- Public API ---------------------------------------------------------------

/// Parse a raw documentation comment.
///
/// The first and last lines are the comment delimiters and are discarded. The
/// returned operation has an empty name; the caller knows which method it is.
pub fn parse_comment(raw: &str) -> OperationSpec {
    let mut op = OperationSpec::default();

    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let body = if lines.len() > 2 {
        &lines[1..lines.len() - 1]
    } else {
        &[][..]
    };

    let mut description: Vec<&str> = Vec::new();

    for &raw_line in body {
        let line = match RE_LEADER.find(raw_line) {
            Some(m) => &raw_line[m.end()..],
            None => raw_line,
        };

        let Some(caps) = RE_TAG.captures(line) else {
            description.push(line);
            continue;
        };

        let name = caps.get(1).map_or("", |m| m.as_str());
        let text = caps.get(2).map_or("", |m| m.as_str());
        match parse_tag(name, text) {
            Some(Tag::Param(param)) => op.set_param(param),
            Some(Tag::Return(ret)) => op.returns = Some(ret),
            None => {
                if name == "param" {
                    debug!(text, "ignoring @param without a $name");
                }
            }
        }
    }

    op.description = description.join("\n").trim().to_string();
    op
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_calculator_add() {
        let op = parse_comment(
            "/**\n * Add two numbers.\n *\n * @param int $a first\n * @param int $b second\n * @return int sum\n */",
        );
        assert_eq!(op.description, "Add two numbers.");
        assert_eq!(op.params.len(), 2);
        assert_eq!(op.params[0].name, "a");
        assert_eq!(op.params[0].ty, "xsd:int");
        assert_eq!(op.params[0].doc.as_deref(), Some("first"));
        assert_eq!(op.params[1].name, "b");
        let ret = op.returns.expect("return tag");
        assert_eq!(ret.ty, "xsd:int");
        assert_eq!(ret.doc.as_deref(), Some("sum"));
    }

    #[test]
    fn params_keep_appearance_order() {
        let op = parse_comment(
            "/**\n * @param string $z last letter\n * @param array $a list\n * @param integer $m middle\n */",
        );
        let got: Vec<_> = op
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.ty.as_str()))
            .collect();
        assert_eq!(
            got,
            [("z", "xsd:string"), ("a", "soapenc:Array"), ("m", "xsd:int")]
        );
    }

    #[test]
    fn duplicate_param_last_wins() {
        let op = parse_comment(
            "/**\n * @param int $a first\n * @param string $b other\n * @param float $a again\n */",
        );
        assert_eq!(op.params.len(), 2);
        assert_eq!(op.params[0].name, "a");
        assert_eq!(op.params[0].ty, "xsd:float");
        assert_eq!(op.params[0].doc.as_deref(), Some("again"));
    }

    #[test]
    fn duplicate_return_last_wins() {
        let op = parse_comment("/**\n * @return int one\n * @return string two\n */");
        let ret = op.returns.unwrap();
        assert_eq!(ret.ty, "xsd:string");
        assert_eq!(ret.doc.as_deref(), Some("two"));
    }

    #[test]
    fn return_without_description() {
        let op = parse_comment("/**\n * @return float\n */");
        let ret = op.returns.unwrap();
        assert_eq!(ret.ty, "xsd:float");
        assert_eq!(ret.doc, None);
    }

    #[test]
    fn param_without_description() {
        let op = parse_comment("/**\n * @param int $count\n */");
        assert_eq!(op.params.len(), 1);
        assert_eq!(op.params[0].name, "count");
        assert_eq!(op.params[0].doc, None);
    }

    #[test]
    fn malformed_tags_are_tolerated() {
        let op = parse_comment(
            "/**\n * Still documented.\n * @param\n * @param int missing_dollar\n */",
        );
        assert!(op.params.is_empty());
        assert!(op.returns.is_none());
        assert_eq!(op.description, "Still documented.");
    }

    #[test]
    fn bare_return_keeps_the_response() {
        let op = parse_comment("/**\n * Does a thing.\n * @return\n */");
        let ret = op.returns.as_ref().expect("bare @return");
        assert_eq!(ret.ty, "xsd:");
        assert_eq!(ret.doc, None);
        assert!(op.has_response());
        assert_eq!(op.description, "Does a thing.");
    }

    #[test]
    fn unknown_tags_are_dropped_from_description() {
        let op = parse_comment("/**\n * Body text.\n * @deprecated use other\n * More.\n */");
        assert_eq!(op.description, "Body text.\nMore.");
        assert!(op.params.is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let op = parse_comment("/**\r\n * Text\r\n * @return int n\r\n */");
        assert_eq!(op.description, "Text");
        assert_eq!(op.returns.unwrap().ty, "xsd:int");
    }

    #[test]
    fn empty_and_single_line_comments() {
        assert_eq!(parse_comment(""), OperationSpec::default());
        assert_eq!(parse_comment("/** @return int */"), OperationSpec::default());
    }

    #[test]
    fn description_is_trimmed_and_joined() {
        let op = parse_comment("/**\n *\n * First line.\n * Second line.\n *\n */");
        assert_eq!(op.description, "First line.\nSecond line.");
    }

    #[test]
    fn parse_tag_rejects_unknown() {
        assert_eq!(parse_tag("throws", "Exception"), None);
    }
}
