//! Turn discovery normalization.
//!
//! The host hands over turn roots as it found them (its fallback selectors
//! may overlap, so duplicates are possible). Normalization dedupes the
//! roots, resolves each turn's role and content root, renders the content
//! to a Markdown fragment, and drops turns with nothing to say.

use std::collections::HashSet;

use tracing::debug;

use crate::markdown::render_node;
use crate::tree::{NodeId, Transcript};

/// Author role of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Section heading label for this role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }

    /// Interpret a host role-marker value.
    ///
    /// Only `"user"` (case-insensitive) maps to [`Role::User`]; any other
    /// marker value (assistant, system, tool, ...) renders under the
    /// Assistant heading.
    pub fn from_marker(marker: &str) -> Role {
        if marker.trim().eq_ignore_ascii_case("user") {
            Role::User
        } else {
            Role::Assistant
        }
    }
}

/// One exchange unit of the transcript, resolved and rendered.
///
/// Exists only for the duration of a single export call.
#[derive(Debug, Clone)]
pub struct Turn {
    /// The turn root as discovered by the host.
    pub root: NodeId,
    /// Resolved author role.
    pub role: Role,
    /// Resolved serializable content root.
    pub content: NodeId,
    /// The content root's Markdown fragment.
    pub markdown: String,
}

/// Normalize the transcript's turn roots into renderable turns.
///
/// For each deduplicated root, in discovery order:
/// - role: the first author-role marker in the subtree (document order),
///   falling back to `default_role` when no marker exists;
/// - content root: the first node flagged as the rendered message body,
///   else the role-marker node, else the turn root itself;
/// - turns whose content renders to whitespace-only Markdown are dropped.
pub fn normalize(transcript: &Transcript, default_role: Role) -> Vec<Turn> {
    let mut seen = HashSet::new();
    let mut turns = Vec::new();

    for &root in transcript.turn_roots() {
        if !seen.insert(root) {
            continue;
        }

        let marker = find_role_marker(transcript, root);
        let role = marker
            .map(|(_, role)| role)
            .unwrap_or(default_role);
        let content = find_content_root(transcript, root)
            .or(marker.map(|(id, _)| id))
            .unwrap_or(root);

        let markdown = render_node(transcript, content);
        if markdown.trim().is_empty() {
            debug!(root = root.0, "dropping empty turn");
            continue;
        }

        turns.push(Turn {
            root,
            role,
            content,
            markdown,
        });
    }

    turns
}

/// First author-role marker in the subtree, in document order.
fn find_role_marker(transcript: &Transcript, root: NodeId) -> Option<(NodeId, Role)> {
    transcript
        .descendants(root)
        .find_map(|id| transcript.attrs.author_role(id).map(|role| (id, role)))
}

/// First rendered-message-body flag in the subtree, in document order.
fn find_content_root(transcript: &Transcript, root: NodeId) -> Option<NodeId> {
    transcript
        .descendants(root)
        .find(|&id| transcript.attrs.is_message_body(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, NodeKind};

    fn turn_with_paragraph(t: &mut Transcript, text: &str) -> NodeId {
        let root = t.alloc_node(Node::new(NodeKind::Container));
        t.append_child(NodeId::ROOT, root);
        t.push_turn_root(root);

        let para = t.alloc_node(Node::new(NodeKind::Paragraph));
        t.append_child(root, para);
        let range = t.append_text(text);
        let leaf = t.alloc_node(Node::text(range));
        t.append_child(para, leaf);
        root
    }

    #[test]
    fn test_role_from_marker() {
        assert_eq!(Role::from_marker("user"), Role::User);
        assert_eq!(Role::from_marker("  USER "), Role::User);
        assert_eq!(Role::from_marker("assistant"), Role::Assistant);
        assert_eq!(Role::from_marker("system"), Role::Assistant);
    }

    #[test]
    fn test_unmarked_turn_gets_default_role() {
        let mut t = Transcript::new();
        turn_with_paragraph(&mut t, "hello");

        let turns = normalize(&t, Role::Assistant);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::Assistant);

        // The default is explicit, not baked in
        assert_eq!(normalize(&t, Role::User)[0].role, Role::User);
    }

    #[test]
    fn test_role_marker_resolves_role() {
        let mut t = Transcript::new();
        let root = turn_with_paragraph(&mut t, "hi");
        t.attrs.set_author_role(root, Role::User);

        let turns = normalize(&t, Role::Assistant);
        assert_eq!(turns[0].role, Role::User);
    }

    #[test]
    fn test_duplicate_roots_deduplicated() {
        let mut t = Transcript::new();
        let root = turn_with_paragraph(&mut t, "once");
        t.push_turn_root(root);

        let turns = normalize(&t, Role::Assistant);
        assert_eq!(turns.len(), 1);
    }

    #[test]
    fn test_empty_turn_dropped() {
        let mut t = Transcript::new();
        turn_with_paragraph(&mut t, "   ");
        turn_with_paragraph(&mut t, "real content");

        let turns = normalize(&t, Role::Assistant);
        assert_eq!(turns.len(), 1);
        assert!(turns[0].markdown.contains("real content"));
    }

    #[test]
    fn test_content_root_prefers_message_body() {
        let mut t = Transcript::new();
        let root = t.alloc_node(Node::new(NodeKind::Container));
        t.append_child(NodeId::ROOT, root);
        t.push_turn_root(root);

        // Boilerplate sibling that should not be serialized
        let noise = t.alloc_node(Node::new(NodeKind::Paragraph));
        t.append_child(root, noise);
        let range = t.append_text("Copy code");
        let leaf = t.alloc_node(Node::text(range));
        t.append_child(noise, leaf);

        let body = t.alloc_node(Node::new(NodeKind::Container));
        t.append_child(root, body);
        t.attrs.set_message_body(body);
        let para = t.alloc_node(Node::new(NodeKind::Paragraph));
        t.append_child(body, para);
        let range = t.append_text("the message");
        let leaf = t.alloc_node(Node::text(range));
        t.append_child(para, leaf);

        let turns = normalize(&t, Role::Assistant);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, body);
        assert!(turns[0].markdown.contains("the message"));
        assert!(!turns[0].markdown.contains("Copy code"));
    }

    #[test]
    fn test_content_root_falls_back_to_role_marker_node() {
        let mut t = Transcript::new();
        let root = t.alloc_node(Node::new(NodeKind::Container));
        t.append_child(NodeId::ROOT, root);
        t.push_turn_root(root);

        let inner = t.alloc_node(Node::new(NodeKind::Container));
        t.append_child(root, inner);
        t.attrs.set_author_role(inner, Role::User);
        let para = t.alloc_node(Node::new(NodeKind::Paragraph));
        t.append_child(inner, para);
        let range = t.append_text("question");
        let leaf = t.alloc_node(Node::text(range));
        t.append_child(para, leaf);

        let turns = normalize(&t, Role::Assistant);
        assert_eq!(turns[0].content, inner);
        assert_eq!(turns[0].role, Role::User);
    }
}
