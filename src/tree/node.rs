//! Content tree node types.

/// Unique identifier for a node within a [`Transcript`](super::Transcript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node ID (always 0).
    pub const ROOT: NodeId = NodeId(0);
}

/// Structural kind of a content node.
///
/// The kind is assigned by the host environment from the rendered
/// structure (tag/role); it is never inferred from text content.
/// Each kind maps directly to a Markdown construct:
/// - Text (leaf string data)
/// - Paragraph, Heading(level)
/// - UnorderedList / OrderedList / ListItem
/// - BlockQuote, Link, InlineCode, CodeBlock
/// - LineBreak
/// - Container (pass-through grouping, the recursion's base case)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// Leaf text content node containing actual string data.
    /// References a range in the transcript's text buffer.
    Text,
    /// Block-level text container.
    Paragraph,
    /// Headings with level 1-6.
    Heading(u8),
    /// Semantic line break. A leaf node, not a container.
    LineBreak,
    /// Unordered (bulleted) list.
    UnorderedList,
    /// Ordered (numbered) list.
    OrderedList,
    /// Individual list items.
    ListItem,
    /// Block quotes.
    BlockQuote,
    /// Hyperlinks. href is stored in `AttrMap`.
    Link,
    /// Inline code span.
    InlineCode,
    /// Fenced code block. Language and raw text are in `AttrMap`.
    CodeBlock,
    /// Generic structural container (layout/grouping, including turn
    /// roots). Unrecognized kinds degrade to this.
    #[default]
    Container,
}

/// Range into the transcript's global text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    /// Byte offset into the buffer.
    pub start: u32,
    /// Length in bytes.
    pub len: u32,
}

impl TextRange {
    /// Create a new text range.
    pub fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// Check if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A node in the content tree.
///
/// Uses a parent-pointer / first-child / next-sibling representation for
/// cheap traversal without per-node child vectors.
#[derive(Debug, Clone)]
pub struct Node {
    /// Structural kind.
    pub kind: NodeKind,
    /// Parent node (None for root).
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Next sibling node.
    pub next_sibling: Option<NodeId>,
    /// Text content range (only for Text nodes).
    pub text: TextRange,
}

impl Node {
    /// Create a new node with the given kind and no text.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            next_sibling: None,
            text: TextRange::default(),
        }
    }

    /// Create a text node referencing the given range.
    pub fn text(range: TextRange) -> Self {
        Self {
            kind: NodeKind::Text,
            parent: None,
            first_child: None,
            next_sibling: None,
            text: range,
        }
    }
}
