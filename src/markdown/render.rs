//! Core content tree → Markdown rendering.
//!
//! `render_node` is a pure recursive transform: content node in, Markdown
//! fragment out. It reads the transcript and nothing else — no I/O, no
//! mutation — so serializing the same tree twice yields identical output.
//!
//! Rule order matters: the first matching kind wins, and anything
//! unmatched falls through to pass-through child concatenation.

use crate::tree::{NodeId, NodeKind, Transcript};

use super::escape::{collapse_blank_runs, escape_backticks, newlines_to_spaces, squeeze_newlines};

/// Transform one content node (and its subtree) to a Markdown fragment.
///
/// Never panics on a well-formed tree. A code block whose raw text has not
/// materialized still emits its fence with an empty body; the preflight
/// hydrator exists to make that case rare, and omitting the block would
/// silently erase a content boundary.
pub fn render_node(transcript: &Transcript, id: NodeId) -> String {
    let Some(node) = transcript.node(id) else {
        return String::new();
    };

    match node.kind {
        NodeKind::Text => transcript.text(node.text).to_string(),

        NodeKind::CodeBlock => {
            let raw = transcript
                .attrs
                .code_text(id)
                .map(str::to_string)
                .unwrap_or_else(|| collect_text(transcript, id));
            let body = raw.trim_end_matches('\n');
            let lang = transcript.attrs.language(id).unwrap_or("");
            format!("\n```{lang}\n{body}\n```\n")
        }

        NodeKind::InlineCode => {
            let text = collect_text(transcript, id);
            format!("`{}`", escape_backticks(&text))
        }

        NodeKind::Link => {
            let href = transcript.attrs.href(id).unwrap_or("");
            let mut label = newlines_to_spaces(&render_children(transcript, id))
                .trim()
                .to_string();
            if label.is_empty() {
                label = href.to_string();
            }
            if href.is_empty() {
                label
            } else {
                format!("[{label}]({href})")
            }
        }

        NodeKind::Heading(level) => {
            let level = level.clamp(1, 6) as usize;
            let text = newlines_to_spaces(&render_children(transcript, id))
                .trim()
                .to_string();
            format!("\n{} {text}\n\n", "#".repeat(level))
        }

        NodeKind::LineBreak => "\n".to_string(),

        NodeKind::UnorderedList => render_list(transcript, id, false),
        NodeKind::OrderedList => render_list(transcript, id, true),

        NodeKind::BlockQuote => {
            let inner = render_children(transcript, id);
            let quoted: Vec<String> = inner
                .trim()
                .split('\n')
                .map(|line| format!("> {line}"))
                .collect();
            format!("\n{}\n\n", quoted.join("\n"))
        }

        NodeKind::Paragraph => {
            let inner = render_children(transcript, id);
            let inner = inner.trim();
            if inner.is_empty() {
                String::new()
            } else {
                format!("\n{inner}\n\n")
            }
        }

        // Pass-through structure, including turn content roots.
        NodeKind::ListItem | NodeKind::Container => render_children(transcript, id),
    }
}

/// Concatenate the transforms of all children in document order, bounding
/// blank-line runs at the join.
pub fn render_children(transcript: &Transcript, id: NodeId) -> String {
    let mut out = String::new();
    for child in transcript.children(id) {
        out.push_str(&render_node(transcript, child));
    }
    collapse_blank_runs(&out)
}

/// Render a list node: one item per direct `ListItem` child.
///
/// First line of each item gets the marker; continuation lines are
/// indented to sit under the item text (two spaces for `- `, three for
/// the numeral + period + space).
fn render_list(transcript: &Transcript, id: NodeId, ordered: bool) -> String {
    let mut items = Vec::new();
    for child in transcript.children(id) {
        let Some(node) = transcript.node(child) else {
            continue;
        };
        if node.kind != NodeKind::ListItem {
            continue;
        }

        let body = render_children(transcript, child);
        let body = squeeze_newlines(body.trim());
        let mut lines = body.split('\n');
        let first = lines.next().unwrap_or("");

        let (marker, indent) = if ordered {
            (format!("{}. ", items.len() + 1), "   ")
        } else {
            ("- ".to_string(), "  ")
        };

        let mut item = format!("{marker}{first}");
        for line in lines {
            item.push('\n');
            item.push_str(indent);
            item.push_str(line);
        }
        items.push(item);
    }
    format!("\n{}\n\n", items.join("\n"))
}

/// Collect the verbatim text of a subtree (inline code spans, and the
/// fallback path for code blocks with no raw-text attribute).
fn collect_text(transcript: &Transcript, id: NodeId) -> String {
    let mut result = String::new();
    for node_id in transcript.descendants(id) {
        if let Some(node) = transcript.node(node_id)
            && node.kind == NodeKind::Text
            && !node.text.is_empty()
        {
            result.push_str(transcript.text(node.text));
        }
    }
    result
}
