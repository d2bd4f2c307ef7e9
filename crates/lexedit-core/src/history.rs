//! Bounded edit history
//!
//! A fixed-capacity ring buffer: pushing past capacity evicts the oldest
//! entry, undo pops the most recent.

use chrono::{DateTime, Utc};
use lexedit_document::StructuredNode;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use ulid::Ulid;

/// Snapshot of the content an edit replaced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistorySnapshot {
    /// A single node
    Node(StructuredNode),
    /// A list of sibling nodes
    Nodes(Vec<StructuredNode>),
}

impl HistorySnapshot {
    /// Snapshot as a fragment node
    #[must_use]
    pub fn to_fragment(&self) -> StructuredNode {
        match self {
            Self::Node(node) => node.clone(),
            Self::Nodes(nodes) => StructuredNode::root(nodes.clone()),
        }
    }

    /// Concatenated text
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.to_fragment().plain_text()
    }
}

impl From<StructuredNode> for HistorySnapshot {
    fn from(node: StructuredNode) -> Self {
        Self::Node(node)
    }
}

impl From<Vec<StructuredNode>> for HistorySnapshot {
    fn from(nodes: Vec<StructuredNode>) -> Self {
        Self::Nodes(nodes)
    }
}

/// One applied edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique entry id
    pub id: Ulid,
    /// When the edit was applied
    pub timestamp: DateTime<Utc>,
    /// Content the edit replaced
    pub before: HistorySnapshot,
    /// Fragment that was applied
    pub after: StructuredNode,
    /// User command
    pub command: String,
    /// Whole document before the edit
    pub document_before: StructuredNode,
}

impl HistoryEntry {
    /// Create entry stamped now
    #[must_use]
    pub fn new(
        before: impl Into<HistorySnapshot>,
        after: StructuredNode,
        command: impl Into<String>,
        document_before: StructuredNode,
    ) -> Self {
        Self {
            id: Ulid::new(),
            timestamp: Utc::now(),
            before: before.into(),
            after,
            command: command.into(),
            document_before,
        }
    }
}

/// Ring buffer of history entries, oldest first
#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl EditHistory {
    /// Create history holding at most `capacity` entries
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::debug!(id = %evicted.id, "evicted oldest history entry");
            }
        }
        self.entries.push_back(entry);
    }

    /// Remove the most recent entry
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop_back()
    }

    /// Most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum entries kept
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(command: &str) -> HistoryEntry {
        HistoryEntry::new(
            StructuredNode::paragraph("before"),
            StructuredNode::root(vec![StructuredNode::paragraph("after")]),
            command,
            StructuredNode::root(vec![StructuredNode::paragraph("before")]),
        )
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut history = EditHistory::new(3);
        for i in 0..5 {
            history.push(entry(&format!("edit {i}")));
        }

        let commands: Vec<_> = history.entries().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, ["edit 2", "edit 3", "edit 4"]);
    }

    #[test]
    fn pop_returns_most_recent() {
        let mut history = EditHistory::new(5);
        history.push(entry("first"));
        history.push(entry("second"));

        assert_eq!(history.pop().map(|e| e.command), Some("second".to_string()));
        assert_eq!(history.len(), 1);
        history.clear();
        assert!(history.pop().is_none());
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut history = EditHistory::new(0);
        history.push(entry("a"));
        history.push(entry("b"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.capacity(), 1);
    }

    #[test]
    fn snapshot_accepts_node_or_list() {
        let node: HistorySnapshot = serde_json::from_str(r#"{"type": "paragraph"}"#).unwrap();
        assert!(matches!(node, HistorySnapshot::Node(_)));

        let nodes: HistorySnapshot =
            serde_json::from_str(r#"[{"type": "paragraph", "children": [{"type": "text", "text": "x"}]}]"#)
                .unwrap();
        assert_eq!(nodes.plain_text(), "x");
        assert!(nodes.to_fragment().is_root());
    }
}
