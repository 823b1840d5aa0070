//! JSON snapshot ingestion.
//!
//! A host that cannot (or does not want to) keep a live tree hands over a
//! deep copy instead: kind, text, and children serialized per node, one
//! object per turn root. Ingesting a snapshot eliminates any consistency
//! risk from reading a tree the host is still mutating, at the cost of
//! the copy. Snapshots are assumed pre-hydrated; pair them with
//! [`NullViewport`](crate::hydrate::NullViewport).
//!
//! Format sketch:
//!
//! ```json
//! {
//!   "title": "Trip planning",
//!   "source_id": "abc123",
//!   "source_url": "https://chat.example.com/c/abc123",
//!   "turns": [
//!     {
//!       "kind": "generic-container",
//!       "role": "user",
//!       "children": [
//!         { "kind": "paragraph", "children": [
//!           { "kind": "text", "text": "Hello" }
//!         ]}
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::tree::{Node, NodeId, NodeKind, Transcript};
use crate::turns::Role;

/// Node kinds as they appear on the wire.
///
/// Unknown kinds deserialize as [`SnapshotKind::Unknown`] and ingest as
/// generic containers, matching the transformer's pass-through rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotKind {
    Text,
    Paragraph,
    Heading,
    LineBreak,
    UnorderedList,
    OrderedList,
    ListItem,
    Blockquote,
    Link,
    InlineCode,
    CodeBlock,
    GenericContainer,
    #[serde(other)]
    Unknown,
}

/// One serialized content node.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotNode {
    pub kind: SnapshotKind,
    /// Raw string value (text nodes).
    #[serde(default)]
    pub text: Option<String>,
    /// Heading level, 1-6 (heading nodes).
    #[serde(default)]
    pub level: Option<u8>,
    /// Link target (link nodes).
    #[serde(default)]
    pub href: Option<String>,
    /// Language tag (code blocks). Structural, never inferred.
    #[serde(default)]
    pub language: Option<String>,
    /// Raw code-block text, bypassing the visual formatting layer.
    #[serde(default)]
    pub raw: Option<String>,
    /// Author-role marker value, when this node carries one.
    #[serde(default)]
    pub role: Option<String>,
    /// Whether this node is the turn's rendered message body.
    #[serde(default)]
    pub message_body: bool,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

/// A serialized transcript with its document metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotDocument {
    pub title: String,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub source_url: String,
    pub turns: Vec<SnapshotNode>,
}

impl SnapshotDocument {
    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the content tree. Each top-level turn object becomes a
    /// registered turn root.
    pub fn into_transcript(self) -> Result<Transcript> {
        let mut transcript = Transcript::new();
        for turn in &self.turns {
            let root = ingest_node(&mut transcript, NodeId::ROOT, turn)?;
            transcript.push_turn_root(root);
        }
        Ok(transcript)
    }
}

fn ingest_node(
    transcript: &mut Transcript,
    parent: NodeId,
    snap: &SnapshotNode,
) -> Result<NodeId> {
    let kind = match snap.kind {
        SnapshotKind::Text => NodeKind::Text,
        SnapshotKind::Paragraph => NodeKind::Paragraph,
        SnapshotKind::Heading => {
            let level = snap.level.ok_or_else(|| {
                Error::InvalidSnapshot("heading node without level".to_string())
            })?;
            if !(1..=6).contains(&level) {
                return Err(Error::InvalidSnapshot(format!(
                    "heading level {level} out of range 1-6"
                )));
            }
            NodeKind::Heading(level)
        }
        SnapshotKind::LineBreak => NodeKind::LineBreak,
        SnapshotKind::UnorderedList => NodeKind::UnorderedList,
        SnapshotKind::OrderedList => NodeKind::OrderedList,
        SnapshotKind::ListItem => NodeKind::ListItem,
        SnapshotKind::Blockquote => NodeKind::BlockQuote,
        SnapshotKind::Link => NodeKind::Link,
        SnapshotKind::InlineCode => NodeKind::InlineCode,
        SnapshotKind::CodeBlock => NodeKind::CodeBlock,
        SnapshotKind::GenericContainer | SnapshotKind::Unknown => NodeKind::Container,
    };

    let id = if kind == NodeKind::Text {
        let range = transcript.append_text(snap.text.as_deref().unwrap_or(""));
        transcript.alloc_node(Node::text(range))
    } else {
        transcript.alloc_node(Node::new(kind))
    };
    transcript.append_child(parent, id);

    if let Some(href) = &snap.href {
        transcript.attrs.set_href(id, href);
    }
    if let Some(language) = &snap.language {
        transcript.attrs.set_language(id, language);
    }
    if let Some(raw) = &snap.raw {
        transcript.attrs.set_code_text(id, raw);
    }
    if let Some(role) = &snap.role {
        transcript.attrs.set_author_role(id, Role::from_marker(role));
    }
    if snap.message_body {
        transcript.attrs.set_message_body(id);
    }

    // Text nodes are leaves; ignore any children the host serialized
    if kind != NodeKind::Text {
        for child in &snap.children {
            ingest_node(transcript, id, child)?;
        }
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::render_node;

    #[test]
    fn test_parse_minimal_snapshot() {
        let json = r#"{
            "title": "Hello",
            "source_url": "https://chat.example.com/c/x",
            "turns": [
                {
                    "kind": "generic-container",
                    "role": "user",
                    "children": [
                        {
                            "kind": "paragraph",
                            "children": [{ "kind": "text", "text": "Hi" }]
                        }
                    ]
                }
            ]
        }"#;

        let doc = SnapshotDocument::from_json(json).unwrap();
        assert_eq!(doc.title, "Hello");
        assert_eq!(doc.source_id, None);

        let transcript = doc.into_transcript().unwrap();
        assert_eq!(transcript.turn_roots().len(), 1);

        let root = transcript.turn_roots()[0];
        assert_eq!(transcript.attrs.author_role(root), Some(Role::User));
        assert_eq!(render_node(&transcript, root), "\nHi\n\n");
    }

    #[test]
    fn test_code_block_attributes() {
        let json = r#"{
            "title": "c",
            "turns": [{
                "kind": "code-block",
                "language": "rust",
                "raw": "fn main() {}\n"
            }]
        }"#;

        let transcript = SnapshotDocument::from_json(json)
            .unwrap()
            .into_transcript()
            .unwrap();
        let root = transcript.turn_roots()[0];

        assert_eq!(
            render_node(&transcript, root),
            "\n```rust\nfn main() {}\n```\n"
        );
    }

    #[test]
    fn test_unknown_kind_ingests_as_container() {
        let json = r#"{
            "title": "c",
            "turns": [{
                "kind": "mystery-widget",
                "children": [{ "kind": "text", "text": "inside" }]
            }]
        }"#;

        let transcript = SnapshotDocument::from_json(json)
            .unwrap()
            .into_transcript()
            .unwrap();
        let root = transcript.turn_roots()[0];

        assert_eq!(transcript.node(root).unwrap().kind, NodeKind::Container);
        assert_eq!(render_node(&transcript, root), "inside");
    }

    #[test]
    fn test_heading_level_out_of_range_rejected() {
        let json = r#"{
            "title": "c",
            "turns": [{ "kind": "heading", "level": 7 }]
        }"#;

        let err = SnapshotDocument::from_json(json)
            .unwrap()
            .into_transcript()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
    }

    #[test]
    fn test_heading_without_level_rejected() {
        let json = r#"{
            "title": "c",
            "turns": [{ "kind": "heading" }]
        }"#;

        let err = SnapshotDocument::from_json(json)
            .unwrap()
            .into_transcript()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = SnapshotDocument::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
