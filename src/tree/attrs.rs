//! Sparse attributes for content nodes.
//!
//! Most nodes carry no attributes at all, so per-node `Option<String>`
//! fields would waste memory. Attributes live in side tables keyed by
//! `NodeId`, with all string values packed into one contiguous buffer and
//! referenced by `TextRange`.

use std::collections::{HashMap, HashSet};

use crate::turns::Role;

use super::node::{NodeId, TextRange};

/// Sparse map for node attributes.
///
/// Stores attributes only for the nodes that have them: link targets,
/// code-block metadata, and the two turn-level markers (author role and
/// rendered-message-body flag) the normalizer resolves against.
#[derive(Debug, Default, Clone)]
pub struct AttrMap {
    /// Contiguous buffer for all string attribute values.
    buffer: String,
    /// href attribute (for links).
    href: HashMap<NodeId, TextRange>,
    /// Language tag (for code blocks). Structural, never inferred.
    language: HashMap<NodeId, TextRange>,
    /// Raw code-block text, bypassing any visual formatting layer.
    code_text: HashMap<NodeId, TextRange>,
    /// Author-role marker (user/assistant).
    author_role: HashMap<NodeId, Role>,
    /// Nodes marked as a turn's rendered message body.
    message_body: HashSet<NodeId>,
}

impl AttrMap {
    /// Create a new empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a string to the buffer and return its TextRange.
    fn append(&mut self, s: &str) -> TextRange {
        let start = self.buffer.len() as u32;
        self.buffer.push_str(s);
        TextRange::new(start, s.len() as u32)
    }

    /// Get a string slice from a TextRange.
    fn get_str(&self, range: TextRange) -> &str {
        let start = range.start as usize;
        let end = (range.start + range.len) as usize;
        &self.buffer[start..end]
    }

    /// Set the href for a node.
    pub fn set_href(&mut self, node: NodeId, href: &str) {
        if !href.is_empty() {
            let range = self.append(href);
            self.href.insert(node, range);
        }
    }

    /// Get the href for a node.
    pub fn href(&self, node: NodeId) -> Option<&str> {
        self.href.get(&node).map(|r| self.get_str(*r))
    }

    /// Set the language tag for a code block.
    pub fn set_language(&mut self, node: NodeId, language: &str) {
        if !language.is_empty() {
            let range = self.append(language);
            self.language.insert(node, range);
        }
    }

    /// Get the language tag for a code block.
    pub fn language(&self, node: NodeId) -> Option<&str> {
        self.language.get(&node).map(|r| self.get_str(*r))
    }

    /// Set the raw text for a code block.
    pub fn set_code_text(&mut self, node: NodeId, text: &str) {
        let range = self.append(text);
        self.code_text.insert(node, range);
    }

    /// Get the raw text for a code block, if it has materialized.
    pub fn code_text(&self, node: NodeId) -> Option<&str> {
        self.code_text.get(&node).map(|r| self.get_str(*r))
    }

    /// Mark a node with an author role.
    pub fn set_author_role(&mut self, node: NodeId, role: Role) {
        self.author_role.insert(node, role);
    }

    /// Get the author-role marker on a node.
    pub fn author_role(&self, node: NodeId) -> Option<Role> {
        self.author_role.get(&node).copied()
    }

    /// Flag a node as a turn's rendered message body.
    pub fn set_message_body(&mut self, node: NodeId) {
        self.message_body.insert(node);
    }

    /// Check whether a node is flagged as a rendered message body.
    pub fn is_message_body(&self, node: NodeId) -> bool {
        self.message_body.contains(&node)
    }
}
