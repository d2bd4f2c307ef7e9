//! Stage 3: textual syntax fixes
//!
//! Fixes are applied cumulatively in a fixed order and the candidate is
//! re-parsed after every fix that changed it. All fixes are aware of string
//! literals and never touch text inside them, except the two fixes whose job
//! is to repair string contents.

use super::{from_first_opener, greedy_span, parse, strip_markdown};
use crate::cascade::{RepairStage, RepairStrategy};
use crate::error::RepairError;
use crate::scanner::{tokenize, TokenKind};
use serde_json::Value;
use std::fmt::Write;

type Fix = fn(&str) -> String;

const FIXES: &[(&str, Fix)] = &[
    ("escape_control_chars", escape_control_chars),
    ("fix_invalid_escapes", fix_invalid_escapes),
    ("drop_trailing_commas", drop_trailing_commas),
    ("insert_adjacent_commas", insert_adjacent_commas),
    ("insert_bare_value_commas", insert_bare_value_commas),
];

/// Apply a fixed sequence of syntax repairs
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxFix;

impl RepairStage for SyntaxFix {
    fn strategy(&self) -> RepairStrategy {
        RepairStrategy::SyntaxFix
    }

    fn attempt(&self, raw: &str) -> Result<Value, RepairError> {
        let stripped = strip_markdown(raw);
        let mut candidate = greedy_span(&stripped)
            .or_else(|| from_first_opener(&stripped))
            .ok_or_else(|| RepairError::no_candidate(self.strategy(), "no bracketed span"))?
            .to_string();

        let mut last_err = None;
        for (name, fix) in FIXES {
            let fixed = fix(&candidate);
            if fixed == candidate {
                continue;
            }
            candidate = fixed;
            match parse(self.strategy(), &candidate) {
                Ok(value) => {
                    tracing::debug!(fix = name, "syntax fix produced parseable candidate");
                    return Ok(value);
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err
            .unwrap_or_else(|| RepairError::no_candidate(self.strategy(), "no applicable fix")))
    }
}

/// Escape raw control characters inside string literals
pub(crate) fn escape_control_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }
        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

/// Double backslashes that do not start a valid escape sequence
pub(crate) fn fix_invalid_escapes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if !in_string {
            in_string = c == '"';
            out.push(c);
            i += 1;
            continue;
        }
        match c {
            '"' => {
                in_string = false;
                out.push(c);
                i += 1;
            }
            '\\' => {
                let next = chars.get(i + 1).copied();
                let valid = match next {
                    Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => true,
                    Some('u') => {
                        chars.len() > i + 5 && chars[i + 2..i + 6].iter().all(char::is_ascii_hexdigit)
                    }
                    _ => false,
                };
                if valid {
                    out.push('\\');
                    if let Some(n) = next {
                        out.push(n);
                    }
                    i += 2;
                } else {
                    out.push_str("\\\\");
                    i += 1;
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Remove commas directly before a closing bracket or brace
pub(crate) fn drop_trailing_commas(text: &str) -> String {
    let tokens = tokenize(text);
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;

    for pair in tokens.windows(2) {
        if pair[0].kind == TokenKind::Comma && matches!(pair[1].kind, TokenKind::Close(_)) {
            out.push_str(&text[copied..pair[0].start]);
            copied = pair[0].end;
        }
    }
    out.push_str(&text[copied..]);
    out
}

/// Insert commas between adjacent structures: `}{`, `][`, `"{`, `""`
pub(crate) fn insert_adjacent_commas(text: &str) -> String {
    insert_commas(text, |a, b| {
        matches!(a, TokenKind::Close(_) | TokenKind::Str { closed: true })
            && matches!(b, TokenKind::Open(_) | TokenKind::Str { .. })
    })
}

/// Insert commas between a bare literal and a neighbouring value
pub(crate) fn insert_bare_value_commas(text: &str) -> String {
    insert_commas(text, |a, b| {
        (a == TokenKind::Literal && b.starts_value()) || (a.ends_value() && b == TokenKind::Literal)
    })
}

fn insert_commas(text: &str, needs_comma: impl Fn(TokenKind, TokenKind) -> bool) -> String {
    let tokens = tokenize(text);
    let mut out = String::with_capacity(text.len() + 8);
    let mut copied = 0;

    for pair in tokens.windows(2) {
        if needs_comma(pair[0].kind, pair[1].kind) {
            out.push_str(&text[copied..pair[0].end]);
            out.push(',');
            copied = pair[0].end;
        }
    }
    out.push_str(&text[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn escapes_newlines_in_strings_only() {
        let text = "{\"text\": \"line one\nline two\"}\n";
        assert_eq!(
            escape_control_chars(text),
            "{\"text\": \"line one\\nline two\"}\n"
        );
    }

    #[test]
    fn escapes_other_control_chars_as_unicode() {
        assert_eq!(escape_control_chars("{\"a\": \"x\u{1}y\"}"), "{\"a\": \"x\\u0001y\"}");
    }

    #[test]
    fn doubles_invalid_escape() {
        assert_eq!(
            fix_invalid_escapes(r#"{"path": "C:\docs\new"}"#),
            r#"{"path": "C:\\docs\new"}"#
        );
        assert_eq!(fix_invalid_escapes(r#""\u00e9""#), r#""\u00e9""#);
        assert_eq!(fix_invalid_escapes(r#""\uZZ""#), r#""\\uZZ""#);
    }

    #[test]
    fn drops_trailing_commas_outside_strings() {
        assert_eq!(
            drop_trailing_commas(r#"{"a": [1, 2, ], "b": ",]", }"#),
            r#"{"a": [1, 2 ], "b": ",]" }"#
        );
    }

    #[test]
    fn inserts_commas_between_structures() {
        assert_eq!(
            insert_adjacent_commas(r#"[{"a":1}{"b":2}]"#),
            r#"[{"a":1},{"b":2}]"#
        );
        assert_eq!(insert_adjacent_commas(r#"["x" "y"]"#), r#"["x", "y"]"#);
        assert_eq!(insert_adjacent_commas(r#"[[1][2]]"#), r#"[[1],[2]]"#);
    }

    #[test]
    fn inserts_commas_after_bare_values() {
        assert_eq!(
            insert_bare_value_commas(r#"{"a": 1 "b": true "c": 2}"#),
            r#"{"a": 1, "b": true, "c": 2}"#
        );
    }

    #[test]
    fn stage_repairs_missing_comma_between_nodes() {
        let raw = r#"{"type":"doc","content":[{"type":"paragraph"}{"type":"paragraph"},]}"#;
        let value = SyntaxFix.attempt(raw).unwrap();
        assert_eq!(
            value,
            json!({"type": "doc", "content": [{"type": "paragraph"}, {"type": "paragraph"}]})
        );
    }

    #[test]
    fn stage_repairs_raw_newline() {
        let raw = "{\"type\":\"text\",\"text\":\"a\nb\"}";
        let value = SyntaxFix.attempt(raw).unwrap();
        assert_eq!(value["text"], "a\nb");
    }
}
