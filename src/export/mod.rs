//! Document assembly and file emission.
//!
//! The assembler concatenates a metadata header with per-turn sections,
//! bounds blank-line runs over the whole document, and derives a
//! filesystem-safe filename. Emission goes through the [`FileSink`] seam
//! so the host decides what "saving" means; [`DirSink`] is the plain
//! write-to-a-directory implementation.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::markdown::collapse_blank_runs;
use crate::turns::Turn;

/// MIME type handed to the sink alongside every export.
pub const MARKDOWN_MIME: &str = "text/markdown";

/// Maximum length (in characters) of the sanitized title portion of a
/// filename.
const MAX_FILENAME_TITLE_CHARS: usize = 120;

/// Length of the source-id suffix appended to filenames.
const FILENAME_ID_CHARS: usize = 8;

/// Metadata for one export call.
#[derive(Debug, Clone)]
pub struct ExportMeta {
    /// Conversation title (becomes the level-1 heading and the filename).
    pub title: String,
    /// Source conversation identifier, when the host could find one.
    pub source_id: Option<String>,
    /// URL of the source conversation.
    pub source_url: String,
    /// Export timestamp.
    pub exported_at: DateTime<Utc>,
}

/// The final export artifact: derived filename plus document text.
///
/// Created once per export call, handed to the sink, then discarded.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    /// Derived `.md` filename.
    pub filename: String,
    /// Complete UTF-8 Markdown payload, ending in exactly one newline.
    pub content: String,
}

/// Destination for the finished document.
pub trait FileSink {
    /// Persist the document. One-shot; no return value beyond the result.
    fn save(&mut self, filename: &str, content: &str, mime: &str) -> io::Result<()>;
}

/// Sink that writes the document into a directory.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    /// Create a sink targeting the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path a given filename would be written to.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl FileSink for DirSink {
    fn save(&mut self, filename: &str, content: &str, _mime: &str) -> io::Result<()> {
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir)?;
        }
        fs::write(self.dir.join(filename), content)
    }
}

/// Assemble the final export document from metadata and normalized turns.
///
/// Layout: `# title`, a metadata list (timestamp, source id or an explicit
/// placeholder, URL), a horizontal rule, then one `## User` / `## Assistant`
/// section per turn, each closed by a rule. The concatenation is bounded
/// to at most one blank line between blocks and ends in exactly one
/// trailing newline.
pub fn assemble(meta: &ExportMeta, turns: &[Turn]) -> ExportDocument {
    let exported = meta
        .exported_at
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    let chat_id = meta.source_id.as_deref().unwrap_or("(not found)");

    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", meta.title));
    out.push_str(&format!("- Exported: {exported}\n"));
    out.push_str(&format!("- Chat ID: {chat_id}\n"));
    out.push_str(&format!("- URL: {}\n\n", meta.source_url));
    out.push_str("---\n\n");

    for turn in turns {
        out.push_str(&format!(
            "## {}\n\n{}\n\n---\n\n",
            turn.role.display_name(),
            turn.markdown.trim()
        ));
    }

    let content = format!("{}\n", collapse_blank_runs(&out).trim());

    ExportDocument {
        filename: derive_filename(&meta.title, meta.source_id.as_deref()),
        content,
    }
}

/// Sanitize a title into a filesystem-safe base name.
///
/// Path-hostile characters become hyphens, whitespace runs collapse to
/// single spaces, the result is bounded in length and defaults to
/// `"chat"` when nothing survives.
pub fn safe_filename(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>' => '-',
            other => other,
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let bounded: String = collapsed.chars().take(MAX_FILENAME_TITLE_CHARS).collect();
    let trimmed = bounded.trim().to_string();

    if trimmed.is_empty() {
        "chat".to_string()
    } else {
        trimmed
    }
}

/// Derive the full `.md` filename, appending a short source-id suffix
/// when one exists.
fn derive_filename(title: &str, source_id: Option<&str>) -> String {
    let base = safe_filename(title);
    match source_id {
        Some(id) if !id.is_empty() => {
            let short: String = id.chars().take(FILENAME_ID_CHARS).collect();
            format!("{base}_{short}.md")
        }
        _ => format!("{base}.md"),
    }
}
