//! Structured document nodes
//!
//! A document is a tree of [`StructuredNode`]s rooted at a node of type
//! [`ROOT_TYPE`]. Every node carries at least one of `type`, `text` or
//! `children`; `children`, when present, is always a list.
//!
//! The serde representation accepts `content` as an alias for `children` so
//! that ProseMirror-shaped JSON deserializes directly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Type of the canonical document root
pub const ROOT_TYPE: &str = "document-root";

/// Type of inline text nodes
pub const TEXT_TYPE: &str = "text";

/// Type of the default text block
pub const PARAGRAPH_TYPE: &str = "paragraph";

/// Node types that occupy a single position and never hold children
const LEAF_TYPES: &[&str] = &[
    "hardBreak",
    "hard_break",
    "horizontalRule",
    "horizontal_rule",
    "image",
    "mention",
];

/// Inline node types other than text
const INLINE_LEAF_TYPES: &[&str] = &["hardBreak", "hard_break", "image", "mention"];

/// Inline formatting applied to a text node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    /// Mark type (e.g. `bold`, `textStyle`)
    #[serde(rename = "type")]
    pub mark_type: String,
    /// Mark attributes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, Value>,
}

impl Mark {
    /// Create mark without attributes
    #[inline]
    #[must_use]
    pub fn new(mark_type: impl Into<String>) -> Self {
        Self {
            mark_type: mark_type.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Add attribute
    #[inline]
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

/// A node of the structured document tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredNode {
    /// Node type (`paragraph`, `text`, `document-root`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Text content for text nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline marks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    /// Node attributes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, Value>,
    /// Child nodes
    #[serde(default, alias = "content", skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<StructuredNode>>,
}

impl StructuredNode {
    /// Container node of the given type
    #[must_use]
    pub fn element(node_type: impl Into<String>, children: Vec<StructuredNode>) -> Self {
        Self {
            node_type: Some(node_type.into()),
            children: Some(children),
            ..Self::default()
        }
    }

    /// Canonical document root
    #[inline]
    #[must_use]
    pub fn root(children: Vec<StructuredNode>) -> Self {
        Self::element(ROOT_TYPE, children)
    }

    /// Text node
    #[inline]
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            node_type: Some(TEXT_TYPE.to_string()),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Paragraph holding a single text node
    #[inline]
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::element(PARAGRAPH_TYPE, vec![Self::text(text)])
    }

    /// Add a mark
    #[inline]
    #[must_use]
    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.push(mark);
        self
    }

    /// Add an attribute
    #[inline]
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Node type, or `""` when absent
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        self.node_type.as_deref().unwrap_or("")
    }

    /// Children as a slice (empty when absent)
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[StructuredNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// True for the canonical root type
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.kind() == ROOT_TYPE
    }

    /// True for nodes carrying text
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.text.is_some() && self.children.is_none()
    }

    /// True for single-position nodes
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none() && LEAF_TYPES.contains(&self.kind())
    }

    /// True for nodes that live inside a text block
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.is_text() || INLINE_LEAF_TYPES.contains(&self.kind())
    }

    /// Concatenated text of this subtree
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }

    /// Size of this node in the flattened position space
    ///
    /// Text counts one per character, leaves count one, every other node
    /// counts its content plus an opening and a closing token.
    #[must_use]
    pub fn node_size(&self) -> usize {
        if self.is_text() {
            return self.text.as_deref().map_or(0, |t| t.chars().count());
        }
        if self.is_leaf() {
            return 1;
        }
        2 + self.content_size()
    }

    /// Sum of child sizes
    #[must_use]
    pub fn content_size(&self) -> usize {
        self.children().iter().map(Self::node_size).sum()
    }

    /// Count nodes of `node_type` in this subtree (including self)
    #[must_use]
    pub fn count_type(&self, node_type: &str) -> usize {
        let own = usize::from(self.kind() == node_type);
        own + self
            .children()
            .iter()
            .map(|c| c.count_type(node_type))
            .sum::<usize>()
    }

    /// True when any node in this subtree has `node_type`
    #[must_use]
    pub fn contains_type(&self, node_type: &str) -> bool {
        self.kind() == node_type || self.children().iter().any(|c| c.contains_type(node_type))
    }

    /// Convert into a JSON value
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn deserializes_content_alias() {
        let node: StructuredNode = serde_json::from_value(json!({
            "type": "doc",
            "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Hello"}]}]
        }))
        .unwrap();

        assert_eq!(node.kind(), "doc");
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.plain_text(), "Hello");
    }

    #[test]
    fn serializes_children_key() {
        let node = StructuredNode::root(vec![StructuredNode::paragraph("A")]);
        let value = node.to_value();
        assert_eq!(
            value,
            json!({
                "type": "document-root",
                "children": [{"type": "paragraph", "children": [{"type": "text", "text": "A"}]}]
            })
        );
    }

    #[test]
    fn node_sizes_follow_position_model() {
        let para = StructuredNode::paragraph("Hello");
        assert_eq!(para.node_size(), 7);

        let doc = StructuredNode::root(vec![para.clone(), para]);
        assert_eq!(doc.content_size(), 14);

        let rule = StructuredNode {
            node_type: Some("horizontalRule".to_string()),
            ..StructuredNode::default()
        };
        assert_eq!(rule.node_size(), 1);

        let empty_para = StructuredNode {
            node_type: Some("paragraph".to_string()),
            ..StructuredNode::default()
        };
        assert_eq!(empty_para.node_size(), 2);
    }

    #[test]
    fn counts_nested_types() {
        let doc = StructuredNode::root(vec![
            StructuredNode::element("heading", vec![StructuredNode::text("Title")]),
            StructuredNode::element(
                "bulletList",
                vec![StructuredNode::element(
                    "listItem",
                    vec![StructuredNode::paragraph("one")],
                )],
            ),
            StructuredNode::paragraph("body"),
        ]);

        assert_eq!(doc.count_type("paragraph"), 2);
        assert_eq!(doc.count_type("heading"), 1);
        assert!(doc.contains_type("listItem"));
        assert!(!doc.contains_type("table"));
    }

    #[test]
    fn marks_round_trip() {
        let node = StructuredNode::text("warning")
            .with_mark(Mark::new("textStyle").with_attr("color", "#ef4444"));
        let back: StructuredNode = serde_json::from_value(node.to_value()).unwrap();
        assert_eq!(back, node);
    }
}
