//! Content tree for a rendered transcript.
//!
//! The tree is an arena: nodes in one `Vec` with parent / first-child /
//! next-sibling links, leaf text in a single global buffer referenced by
//! ranges, and sparse attributes in side tables. The host (or the
//! `snapshot` ingester) builds it once per export call; rendering never
//! mutates it.
//!
//! # Example
//!
//! ```
//! use chatmark::tree::{Node, NodeId, NodeKind, Transcript};
//!
//! let mut transcript = Transcript::new();
//! let turn = transcript.alloc_node(Node::new(NodeKind::Container));
//! transcript.append_child(NodeId::ROOT, turn);
//! transcript.push_turn_root(turn);
//!
//! let para = transcript.alloc_node(Node::new(NodeKind::Paragraph));
//! transcript.append_child(turn, para);
//! let range = transcript.append_text("Hello");
//! let text = transcript.alloc_node(Node::text(range));
//! transcript.append_child(para, text);
//!
//! assert_eq!(transcript.turn_roots(), &[turn]);
//! ```

mod attrs;
mod node;

pub use attrs::AttrMap;
pub use node::{Node, NodeId, NodeKind, TextRange};

/// A transcript's content in tree form.
///
/// Index 0 is always a `Container` root; turn roots are registered
/// explicitly so discovery order is preserved even if the host hands over
/// roots that are not direct children of the document root.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// All nodes in the tree (index 0 is always the root).
    nodes: Vec<Node>,
    /// Sparse attributes (href, language, raw code text, markers).
    pub attrs: AttrMap,
    /// Global text buffer (text nodes reference ranges into this).
    text: String,
    /// Turn roots in discovery (document) order. May contain duplicates
    /// when the host's fallback selectors overlap; the normalizer dedupes.
    turn_roots: Vec<NodeId>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// Create a new empty transcript with a container root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Container)],
            attrs: AttrMap::new(),
            text: String::new(),
            turn_roots: Vec::new(),
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate a new node and return its ID.
    pub fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append text to the global buffer and return the range.
    pub fn append_text(&mut self, text: &str) -> TextRange {
        let start = self.text.len() as u32;
        self.text.push_str(text);
        TextRange::new(start, text.len() as u32)
    }

    /// Get text from a range.
    pub fn text(&self, range: TextRange) -> &str {
        let start = range.start as usize;
        let end = (range.start + range.len) as usize;
        &self.text[start..end]
    }

    /// Append a child node to a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(child_node) = self.nodes.get_mut(child.0 as usize) {
            child_node.parent = Some(parent);
        }

        if let Some(parent_node) = self.nodes.get(parent.0 as usize) {
            if let Some(first_child) = parent_node.first_child {
                // Find last sibling and append after it
                let mut current = first_child;
                while let Some(node) = self.nodes.get(current.0 as usize) {
                    if let Some(next) = node.next_sibling {
                        current = next;
                    } else {
                        break;
                    }
                }
                if let Some(last_node) = self.nodes.get_mut(current.0 as usize) {
                    last_node.next_sibling = Some(child);
                }
            } else if let Some(parent_node) = self.nodes.get_mut(parent.0 as usize) {
                parent_node.first_child = Some(child);
            }
        }
    }

    /// Register a node as a turn root.
    pub fn push_turn_root(&mut self, id: NodeId) {
        self.turn_roots.push(id);
    }

    /// Turn roots in discovery order.
    pub fn turn_roots(&self) -> &[NodeId] {
        &self.turn_roots
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        let first_child = self
            .nodes
            .get(parent.0 as usize)
            .and_then(|n| n.first_child);
        ChildIter {
            transcript: self,
            current: first_child,
        }
    }

    /// Iterate over a subtree (including `id` itself) in document order.
    pub fn descendants(&self, id: NodeId) -> DfsIter<'_> {
        DfsIter {
            transcript: self,
            stack: vec![id],
        }
    }
}

/// Iterator over children of a node.
pub struct ChildIter<'a> {
    transcript: &'a Transcript,
    current: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self
            .transcript
            .nodes
            .get(current.0 as usize)
            .and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Depth-first iterator over a subtree.
pub struct DfsIter<'a> {
    transcript: &'a Transcript,
    stack: Vec<NodeId>,
}

impl Iterator for DfsIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        let mut children: Vec<NodeId> = self.transcript.children(current).collect();
        children.reverse();
        self.stack.extend(children);

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_creation() {
        let transcript = Transcript::new();
        assert_eq!(transcript.node_count(), 1);
        assert_eq!(transcript.root(), NodeId::ROOT);

        let root = transcript.node(NodeId::ROOT).unwrap();
        assert_eq!(root.kind, NodeKind::Container);
        assert!(root.parent.is_none());
    }

    #[test]
    fn test_text_buffer() {
        let mut transcript = Transcript::new();

        let range1 = transcript.append_text("Hello, ");
        let range2 = transcript.append_text("World!");

        assert_eq!(transcript.text(range1), "Hello, ");
        assert_eq!(transcript.text(range2), "World!");
    }

    #[test]
    fn test_node_tree() {
        let mut transcript = Transcript::new();

        let para = transcript.alloc_node(Node::new(NodeKind::Paragraph));
        transcript.append_child(NodeId::ROOT, para);

        let range = transcript.append_text("Test content");
        let text = transcript.alloc_node(Node::text(range));
        transcript.append_child(para, text);

        let children: Vec<_> = transcript.children(NodeId::ROOT).collect();
        assert_eq!(children, vec![para]);

        let text_children: Vec<_> = transcript.children(para).collect();
        assert_eq!(text_children.len(), 1);
        assert_eq!(
            transcript.node(text_children[0]).unwrap().kind,
            NodeKind::Text
        );
    }

    #[test]
    fn test_descendants_document_order() {
        let mut transcript = Transcript::new();

        let para1 = transcript.alloc_node(Node::new(NodeKind::Paragraph));
        let para2 = transcript.alloc_node(Node::new(NodeKind::Paragraph));
        transcript.append_child(NodeId::ROOT, para1);
        transcript.append_child(NodeId::ROOT, para2);

        let range = transcript.append_text("Text");
        let text = transcript.alloc_node(Node::text(range));
        transcript.append_child(para1, text);

        let nodes: Vec<_> = transcript.descendants(NodeId::ROOT).collect();
        assert_eq!(nodes, vec![NodeId::ROOT, para1, text, para2]);
    }

    #[test]
    fn test_turn_roots_preserve_order() {
        let mut transcript = Transcript::new();

        let a = transcript.alloc_node(Node::new(NodeKind::Container));
        let b = transcript.alloc_node(Node::new(NodeKind::Container));
        transcript.append_child(NodeId::ROOT, a);
        transcript.append_child(NodeId::ROOT, b);
        transcript.push_turn_root(a);
        transcript.push_turn_root(b);

        assert_eq!(transcript.turn_roots(), &[a, b]);
    }
}
