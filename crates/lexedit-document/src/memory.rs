//! In-memory document handle
//!
//! Positions follow the ProseMirror model: every character of text occupies
//! one position, leaf nodes occupy one, and every other node occupies its
//! content plus an opening and a closing token. Position `0` is the start of
//! the root's content and `size()` its end.

use crate::error::DocumentError;
use crate::handle::DocumentHandle;
use crate::node::{StructuredNode, PARAGRAPH_TYPE, ROOT_TYPE};
use crate::range::SelectionRange;

/// Document held entirely in memory
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    root: StructuredNode,
    selection: SelectionRange,
}

impl MemoryDocument {
    /// Create document from a root node
    ///
    /// A text or leaf node is wrapped in a fresh root.
    #[must_use]
    pub fn new(root: StructuredNode) -> Self {
        let root = into_root(root.clone()).unwrap_or_else(|_| StructuredNode::root(vec![root]));
        Self {
            root,
            selection: SelectionRange::default(),
        }
    }

    /// Empty document
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::new(StructuredNode::root(Vec::new()))
    }

    /// Decode document from JSON
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let root: StructuredNode = serde_json::from_str(json)?;
        Ok(Self::new(root))
    }

    /// Encode document as pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> &StructuredNode {
        &self.root
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::empty()
    }
}

impl DocumentHandle for MemoryDocument {
    fn selection(&self) -> SelectionRange {
        self.selection
    }

    fn set_selection(&mut self, range: SelectionRange) -> Result<(), DocumentError> {
        range.check(self.size())?;
        self.selection = range;
        Ok(())
    }

    fn size(&self) -> usize {
        self.root.content_size()
    }

    fn fragment(&self, range: SelectionRange) -> Result<StructuredNode, DocumentError> {
        range.check(self.size())?;
        Ok(StructuredNode {
            children: Some(cut_nodes(self.root.children(), range.from, range.to)),
            ..StructuredNode::default()
        })
    }

    fn full_document(&self) -> StructuredNode {
        self.root.clone()
    }

    fn plain_text(&self) -> String {
        self.root
            .children()
            .iter()
            .map(StructuredNode::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn text_between(&self, range: SelectionRange) -> Result<String, DocumentError> {
        range.check(self.size())?;
        Ok(cut_nodes(self.root.children(), range.from, range.to)
            .iter()
            .map(StructuredNode::plain_text)
            .collect())
    }

    fn replace_range(
        &mut self,
        range: SelectionRange,
        nodes: Vec<StructuredNode>,
    ) -> Result<(), DocumentError> {
        let size = self.size();
        range.check(size)?;

        let children = self.root.children();
        let (new_children, inserted) = if range.spans_whole(size) {
            let blocks = wrap_inline(nodes);
            let inserted = blocks.iter().map(StructuredNode::node_size).sum();
            (blocks, inserted)
        } else {
            splice_blocks(children, range, nodes, size)
        };

        self.root.children = Some(new_children);
        let cursor = (range.from + inserted).min(self.size());
        self.selection = SelectionRange::cursor(cursor);

        tracing::debug!(%range, inserted, "replaced document range");
        Ok(())
    }

    fn set_document(&mut self, document: StructuredNode) -> Result<(), DocumentError> {
        self.root = into_root(document)?;
        self.selection = SelectionRange::default();
        Ok(())
    }
}

/// Coerce a node into a document root
fn into_root(mut node: StructuredNode) -> Result<StructuredNode, DocumentError> {
    if node.is_text() || node.is_leaf() {
        return Err(DocumentError::Rejected(
            "document root must be a container node".to_string(),
        ));
    }
    if node.node_type.is_none() {
        node.node_type = Some(ROOT_TYPE.to_string());
    }
    if node.children.is_none() {
        node.children = Some(Vec::new());
    }
    Ok(node)
}

/// Replace a partial range of top-level blocks
///
/// Partially covered blocks are split; inline inserts landing inside a single
/// text block are spliced into it instead.
fn splice_blocks(
    children: &[StructuredNode],
    range: SelectionRange,
    nodes: Vec<StructuredNode>,
    size: usize,
) -> (Vec<StructuredNode>, usize) {
    let head_block = block_containing(children, range.from);
    let tail_block = block_containing(children, range.to);

    let mut head = cut_nodes(children, 0, range.from);
    let mut tail = cut_nodes(children, range.to, size);

    let inline_insert = !nodes.is_empty() && nodes.iter().all(StructuredNode::is_inline);
    let same_text_block = match (head_block, tail_block) {
        (Some(a), Some(b)) if a == b => children[a].children().iter().all(StructuredNode::is_inline),
        _ => false,
    };

    if inline_insert && same_text_block && !tail.is_empty() {
        if let Some(mut left) = head.pop() {
            let right = tail.remove(0);
            let inserted = nodes.iter().map(StructuredNode::node_size).sum();
            let mut merged = left.children.take().unwrap_or_default();
            merged.extend(nodes);
            merged.extend(right.children.unwrap_or_default());
            left.children = Some(merged);
            head.push(left);
            head.extend(tail);
            return (head, inserted);
        }
    }

    if head_block.is_some() && head.last().is_some_and(is_hollow) {
        head.pop();
    }
    if tail_block.is_some() && tail.first().is_some_and(is_hollow) {
        tail.remove(0);
    }

    let blocks = wrap_inline(nodes);
    let inserted = blocks.iter().map(StructuredNode::node_size).sum();
    head.extend(blocks);
    head.extend(tail);
    (head, inserted)
}

/// Index of the top-level node strictly containing `pos`
fn block_containing(children: &[StructuredNode], pos: usize) -> Option<usize> {
    let mut start = 0;
    for (idx, child) in children.iter().enumerate() {
        let end = start + child.node_size();
        if start < pos && pos < end {
            return Some(idx);
        }
        start = end;
    }
    None
}

/// Cut `nodes` down to the positions `from..to` (relative to their parent's content)
fn cut_nodes(nodes: &[StructuredNode], from: usize, to: usize) -> Vec<StructuredNode> {
    let mut out = Vec::new();
    let mut start = 0;

    for node in nodes {
        let size = node.node_size();
        let end = start + size;
        let node_start = start;
        start = end;

        if end <= from || node_start >= to {
            continue;
        }

        if node.is_text() {
            let skip = from.saturating_sub(node_start);
            let take = to.min(end) - from.max(node_start);
            let text: String = node
                .text
                .as_deref()
                .unwrap_or_default()
                .chars()
                .skip(skip)
                .take(take)
                .collect();
            out.push(StructuredNode {
                text: Some(text),
                ..node.clone()
            });
        } else if node.is_leaf() {
            out.push(node.clone());
        } else {
            let inner_from = from.saturating_sub(node_start + 1);
            let inner_to = to.min(end - 1).saturating_sub(node_start + 1);
            out.push(StructuredNode {
                children: node
                    .children
                    .as_ref()
                    .map(|c| cut_nodes(c, inner_from, inner_to)),
                ..node.clone()
            });
        }
    }

    out
}

/// Group runs of inline nodes into paragraphs
fn wrap_inline(nodes: Vec<StructuredNode>) -> Vec<StructuredNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut run: Vec<StructuredNode> = Vec::new();

    for node in nodes {
        if node.is_inline() {
            run.push(node);
        } else {
            if !run.is_empty() {
                out.push(StructuredNode::element(PARAGRAPH_TYPE, std::mem::take(&mut run)));
            }
            out.push(node);
        }
    }
    if !run.is_empty() {
        out.push(StructuredNode::element(PARAGRAPH_TYPE, run));
    }
    out
}

/// True when a node holds neither text nor leaves
fn is_hollow(node: &StructuredNode) -> bool {
    if node.is_text() {
        return node.text.as_deref().unwrap_or_default().is_empty();
    }
    if node.is_leaf() {
        return false;
    }
    node.children().iter().all(is_hollow)
}
