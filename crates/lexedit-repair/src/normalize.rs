//! Structural normalizer
//!
//! Coerces any parsed value into the canonical root shape
//! `{"type": "document-root", "children": [...]}`. Shape rules are evaluated
//! in a fixed order:
//!
//! 1. bare array: wrapped as the root's children
//! 2. object of the root type: kept as is
//! 3. object with children but no type: root type injected
//! 4. object with neither type nor children: becomes the single child
//! 5. object of another type: its list of children is lifted into a new root;
//!    without one the object itself becomes the single child
//!
//! Before dispatch, `content` keys are renamed to `children` throughout the
//! tree and null-valued node keys are dropped. Scalars pass through untouched
//! and are rejected by the validator.

use lexedit_document::ROOT_TYPE;
use serde_json::{Map, Value};

/// Keys a node may carry
const NODE_KEYS: &[&str] = &["type", "text", "marks", "attrs", "children", "content"];

/// Shape rule that fired for a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Bare array
    Array,
    /// Already canonical
    Root,
    /// Children without a type
    Untyped,
    /// Neither type nor children
    Bare,
    /// Foreign container whose children were lifted
    Lifted,
    /// Foreign node wrapped as the single child
    Wrapped,
    /// Scalar value
    Scalar,
}

/// Normalize `value` into the canonical root shape
#[must_use]
pub fn normalize(value: Value) -> Value {
    normalize_with_shape(value).0
}

/// Normalize and report which rule applied
#[must_use]
pub fn normalize_with_shape(value: Value) -> (Value, Shape) {
    let (value, shape) = match canonical_keys(value) {
        Value::Array(items) => (root(items), Shape::Array),
        Value::Object(map) => normalize_object(map),
        scalar => (scalar, Shape::Scalar),
    };
    tracing::debug!(?shape, "normalized fragment shape");
    (value, shape)
}

/// True when `value` already has the canonical root shape
#[must_use]
pub fn is_canonical(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some(ROOT_TYPE)
        && value.get("children").is_some_and(Value::is_array)
}

fn normalize_object(mut map: Map<String, Value>) -> (Value, Shape) {
    let node_type = map.get("type").and_then(Value::as_str).map(str::to_owned);

    match (node_type.as_deref(), map.contains_key("children")) {
        (Some(ROOT_TYPE), _) => {
            map.entry("children").or_insert_with(|| Value::Array(Vec::new()));
            (Value::Object(map), Shape::Root)
        }
        (None, true) => {
            map.insert("type".to_string(), Value::String(ROOT_TYPE.to_string()));
            (Value::Object(map), Shape::Untyped)
        }
        (None, false) => (root(vec![Value::Object(map)]), Shape::Bare),
        (Some(_), _) => match map.remove("children") {
            Some(Value::Array(children)) => (root(children), Shape::Lifted),
            Some(other) => {
                map.insert("children".to_string(), other);
                (root(vec![Value::Object(map)]), Shape::Wrapped)
            }
            None => (root(vec![Value::Object(map)]), Shape::Wrapped),
        },
    }
}

fn root(children: Vec<Value>) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), Value::String(ROOT_TYPE.to_string()));
    map.insert("children".to_string(), Value::Array(children));
    Value::Object(map)
}

/// Rename `content` to `children` and drop null node keys, recursively
fn canonical_keys(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            map.retain(|key, v| !(v.is_null() && NODE_KEYS.contains(&key.as_str())));
            if let Some(content) = map.remove("content") {
                map.entry("children").or_insert(content);
            }
            match map.remove("children") {
                Some(Value::Array(children)) => {
                    let children = children.into_iter().map(canonical_keys).collect();
                    map.insert("children".to_string(), Value::Array(children));
                }
                Some(other) => {
                    map.insert("children".to_string(), other);
                }
                None => {}
            }
            Value::Object(map)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonical_keys).collect()),
        scalar => scalar,
    }
}
