//! # chatmark
//!
//! Export a rendered chat transcript to a single, well-formed Markdown
//! document.
//!
//! ## Features
//!
//! - Pure recursive content tree → Markdown transform (headings, lists,
//!   quotes, fenced code blocks with language tags, inline code, links)
//! - Turn normalization (role resolution, content-root fallback, empty
//!   turns dropped)
//! - Render-readiness preflight for hosts that lazily materialize code
//!   blocks, behind the [`ViewportOps`] capability trait
//! - Document assembly with a metadata header and a derived filename
//! - JSON snapshot ingestion for hosts that hand over a deep copy
//!
//! ## Quick Start
//!
//! ```
//! use chatmark::{DirSink, Exporter, ExportMeta, SnapshotDocument};
//!
//! let json = r#"{
//!     "title": "Greetings",
//!     "source_id": "abc123",
//!     "source_url": "https://chat.example.com/c/abc123",
//!     "turns": [{
//!         "kind": "generic-container",
//!         "role": "user",
//!         "children": [{
//!             "kind": "paragraph",
//!             "children": [{ "kind": "text", "text": "Hello" }]
//!         }]
//!     }]
//! }"#;
//!
//! let snapshot = SnapshotDocument::from_json(json).unwrap();
//! let meta = ExportMeta {
//!     title: snapshot.title.clone(),
//!     source_id: snapshot.source_id.clone(),
//!     source_url: snapshot.source_url.clone(),
//!     exported_at: chrono::Utc::now(),
//! };
//! let transcript = snapshot.into_transcript().unwrap();
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut sink = DirSink::new(dir.path());
//! let doc = Exporter::new().export(&transcript, &meta, &mut sink).unwrap();
//! assert_eq!(doc.filename, "Greetings_abc123.md");
//! ```
//!
//! Embedded in a live host, use [`Exporter::export_with_host`] with a
//! [`ViewportOps`] implementation so lazily-rendered code blocks are
//! hydrated before serialization.

pub mod error;
pub mod export;
pub mod hydrate;
pub mod markdown;
pub mod snapshot;
pub mod tree;
pub mod turns;

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

pub use error::{Error, Result};
pub use export::{DirSink, ExportDocument, ExportMeta, FileSink, MARKDOWN_MIME, assemble};
pub use hydrate::{MAX_HYDRATED_BLOCKS, NullViewport, ViewportOps, hydrate};
pub use markdown::render_node;
pub use snapshot::{SnapshotDocument, SnapshotNode};
pub use tree::{Node, NodeId, NodeKind, Transcript};
pub use turns::{Role, Turn, normalize};

/// Knobs for one export call.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Role assigned to turns with no discoverable role marker.
    ///
    /// Defaults to [`Role::Assistant`]: unmarked turns are far more often
    /// model output than user input, but the bias is explicit here rather
    /// than baked into the normalizer.
    pub default_role: Role,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            default_role: Role::Assistant,
        }
    }
}

/// Build the export document without emitting it.
///
/// Normalizes turns and assembles the header + per-turn sections. Returns
/// [`Error::NoTurns`] when nothing serializable was found.
pub fn render_transcript(
    transcript: &Transcript,
    meta: &ExportMeta,
    options: &ExportOptions,
) -> Result<ExportDocument> {
    let turns = normalize(transcript, options.default_role);
    if turns.is_empty() {
        return Err(Error::NoTurns);
    }
    debug!(turns = turns.len(), "assembling export document");
    Ok(assemble(meta, &turns))
}

/// Export entry point with a single-slot in-flight guard.
///
/// At most one export runs at a time; a second call while one is pending
/// is rejected with [`Error::ExportInFlight`] rather than queued. The
/// trigger collaborator (button, shortcut, CLI) is expected to surface
/// that to the user.
#[derive(Debug, Default)]
pub struct Exporter {
    options: ExportOptions,
    in_flight: AtomicBool,
}

impl Exporter {
    /// Create an exporter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an exporter with explicit options.
    pub fn with_options(options: ExportOptions) -> Self {
        Self {
            options,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Export a pre-hydrated transcript (e.g. an ingested snapshot) and
    /// hand it to the sink. Returns the document that was saved.
    pub fn export<S: FileSink>(
        &self,
        transcript: &Transcript,
        meta: &ExportMeta,
        sink: &mut S,
    ) -> Result<ExportDocument> {
        let _guard = self.acquire()?;
        let doc = render_transcript(transcript, meta, &self.options)?;
        sink.save(&doc.filename, &doc.content, MARKDOWN_MIME)?;
        debug!(filename = %doc.filename, bytes = doc.content.len(), "export saved");
        Ok(doc)
    }

    /// Export a live transcript: run the hydration preflight against the
    /// host viewport, then serialize and save.
    pub async fn export_with_host<H: ViewportOps, S: FileSink>(
        &self,
        host: &H,
        transcript: &Transcript,
        meta: &ExportMeta,
        sink: &mut S,
    ) -> Result<ExportDocument> {
        let _guard = self.acquire()?;
        hydrate(host, transcript).await;
        let doc = render_transcript(transcript, meta, &self.options)?;
        sink.save(&doc.filename, &doc.content, MARKDOWN_MIME)?;
        debug!(filename = %doc.filename, bytes = doc.content.len(), "export saved");
        Ok(doc)
    }

    fn acquire(&self) -> Result<InFlightGuard<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(Error::ExportInFlight);
        }
        Ok(InFlightGuard {
            slot: &self.in_flight,
        })
    }
}

/// Releases the in-flight slot on every exit path.
struct InFlightGuard<'a> {
    slot: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.slot.store(false, Ordering::Release);
    }
}
