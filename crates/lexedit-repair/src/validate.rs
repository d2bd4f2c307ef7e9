//! Fragment validation
//!
//! Structural errors are collected with a JSON-path-like location rather than
//! dropping offending nodes. The content-preservation check only warns.

use crate::error::RepairError;
use lexedit_document::StructuredNode;
use serde::Serialize;
use serde_json::Value;

/// Warning emitted when a non-empty original produced an empty result
pub const LOST_CONTENT_WARNING: &str = "response appears to have lost all content";

/// Outcome of validating a normalized fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Structural errors; any entry blocks the apply
    pub errors: Vec<String>,
    /// Advisory warnings
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// True when there are no errors
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate structure and content preservation against the original text
#[must_use]
pub fn validate(fragment: &Value, original_text: &str) -> ValidationReport {
    let errors = check_structure(fragment);

    let mut warnings = Vec::new();
    if !original_text.trim().is_empty() && value_text(fragment).trim().is_empty() {
        warnings.push(LOST_CONTENT_WARNING.to_string());
    }

    ValidationReport { errors, warnings }
}

/// Structural errors of `fragment`, empty when well-formed
#[must_use]
pub fn check_structure(fragment: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    if fragment.is_object() {
        check_node(fragment, "$", &mut errors);
    } else {
        errors.push(format!("fragment must be an object, found {}", kind_of(fragment)));
    }
    errors
}

fn check_node(node: &Value, path: &str, errors: &mut Vec<String>) {
    let Some(map) = node.as_object() else {
        errors.push(format!("{path}: node must be an object, found {}", kind_of(node)));
        return;
    };

    if !["type", "text", "children"].iter().any(|k| map.contains_key(*k)) {
        errors.push(format!("{path}: node has no type, text or children"));
    }

    for key in ["type", "text"] {
        if let Some(v) = map.get(key) {
            if !v.is_string() {
                errors.push(format!("{path}: {key} must be a string, found {}", kind_of(v)));
            }
        }
    }

    if let Some(attrs) = map.get("attrs") {
        if !attrs.is_object() {
            errors.push(format!("{path}: attrs must be an object, found {}", kind_of(attrs)));
        }
    }

    match map.get("marks") {
        Some(Value::Array(marks)) => {
            for (idx, mark) in marks.iter().enumerate() {
                let typed = mark.get("type").is_some_and(Value::is_string);
                let attrs_ok = mark.get("attrs").map_or(true, Value::is_object);
                if !typed || !attrs_ok {
                    errors.push(format!(
                        "{path}.marks[{idx}]: mark must be an object with a string type"
                    ));
                }
            }
        }
        Some(other) => errors.push(format!("{path}: marks must be a list, found {}", kind_of(other))),
        None => {}
    }

    match map.get("children") {
        Some(Value::Array(children)) => {
            for (idx, child) in children.iter().enumerate() {
                check_node(child, &format!("{path}.children[{idx}]"), errors);
            }
        }
        Some(other) => errors.push(format!(
            "{path}: children must be a list, found {}",
            kind_of(other)
        )),
        None => {}
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Concatenated text of every string `text` field in the tree
#[must_use]
pub fn value_text(value: &Value) -> String {
    fn collect(value: &Value, out: &mut String) {
        if let Some(text) = value.get("text").and_then(Value::as_str) {
            out.push_str(text);
        }
        if let Some(children) = value.get("children").and_then(Value::as_array) {
            for child in children {
                collect(child, out);
            }
        }
    }

    let mut out = String::new();
    collect(value, &mut out);
    out
}

/// Convert a validated fragment into document nodes
pub fn into_fragment(value: Value) -> Result<StructuredNode, RepairError> {
    serde_json::from_value(value).map_err(|e| RepairError::Conversion(e.to_string()))
}
