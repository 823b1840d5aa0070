//! Render-readiness preflight.
//!
//! Some hosts materialize code-block bodies only once they intersect the
//! viewport; serializing before that happens silently yields empty fences.
//! The hydrator walks every code block into view before the transformer
//! reads anything, then puts the viewport back where it was.
//!
//! The host's scrolling surface is abstracted behind [`ViewportOps`]. A
//! host with a real completion signal overrides [`ViewportOps::content_ready`];
//! the default reproduces the classic blind approach (one paint frame plus
//! a short settle delay). Static snapshots use [`NullViewport`] and skip
//! the whole dance.

use std::time::Duration;

use tracing::{debug, warn};

use crate::tree::{NodeId, NodeKind, Transcript};

/// Upper bound on hydrated code blocks per export.
///
/// A very long transcript does not hydrate indefinitely: blocks are
/// visited in document order, so past the cap it is always the trailing
/// blocks that are serialized as-is, possibly empty.
pub const MAX_HYDRATED_BLOCKS: usize = 64;

/// Settle delay used by the default [`ViewportOps::content_ready`].
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Host scrolling-surface capabilities used by the hydrator.
///
/// All methods are best-effort: a host that cannot scroll a particular
/// node returns `false` from [`scroll_into_view`](Self::scroll_into_view)
/// and the hydrator degrades to a no-op for that node instead of failing
/// the export.
#[allow(async_fn_in_trait)]
pub trait ViewportOps {
    /// Current scroll offset of the scrolling surface.
    fn scroll_offset(&self) -> f64;

    /// Restore the scrolling surface to a previously captured offset.
    fn scroll_to(&self, offset: f64);

    /// Bring a node into the center of the viewport. Returns `false` when
    /// the primitive is unavailable for this node.
    async fn scroll_into_view(&self, node: NodeId) -> bool;

    /// Suspend until the host's next paint frame.
    async fn next_frame(&self);

    /// Suspend for a fixed delay on the host's timer.
    async fn settle(&self, delay: Duration);

    /// Suspend until the node's lazily-rendered content has materialized.
    ///
    /// Hosts with an explicit readiness signal should override this. The
    /// default has no such signal and falls back to one paint frame plus
    /// [`SETTLE_DELAY`], which races the host's render pipeline but works
    /// in practice.
    async fn content_ready(&self, _node: NodeId) {
        self.next_frame().await;
        self.settle(SETTLE_DELAY).await;
    }
}

/// No-op viewport for hosts whose content is already materialized
/// (ingested snapshots, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullViewport;

impl ViewportOps for NullViewport {
    fn scroll_offset(&self) -> f64 {
        0.0
    }

    fn scroll_to(&self, _offset: f64) {}

    async fn scroll_into_view(&self, _node: NodeId) -> bool {
        false
    }

    async fn next_frame(&self) {}

    async fn settle(&self, _delay: Duration) {}
}

/// Force lazily-rendered code blocks to materialize, then restore the
/// original scroll position.
///
/// Visits code blocks across all turns in document order, bounded by
/// [`MAX_HYDRATED_BLOCKS`]. Suspends at each block until the host reports
/// (or is assumed) ready. Not cancellable mid-flight; a host whose paint
/// loop stalls will stall the export with it.
pub async fn hydrate<H: ViewportOps>(host: &H, transcript: &Transcript) {
    let mut blocks = collect_code_blocks(transcript);
    if blocks.is_empty() {
        return;
    }
    if blocks.len() > MAX_HYDRATED_BLOCKS {
        warn!(
            total = blocks.len(),
            cap = MAX_HYDRATED_BLOCKS,
            "transcript exceeds hydration cap; trailing code blocks may serialize empty"
        );
        blocks.truncate(MAX_HYDRATED_BLOCKS);
    }
    debug!(count = blocks.len(), "hydrating code blocks");

    let origin = host.scroll_offset();

    for id in blocks {
        if !host.scroll_into_view(id).await {
            // Primitive unavailable: no-op hydration for this node
            continue;
        }
        host.content_ready(id).await;
    }

    host.scroll_to(origin);
    host.next_frame().await;
}

/// Code-block nodes across all turns, in document order.
fn collect_code_blocks(transcript: &Transcript) -> Vec<NodeId> {
    let mut blocks = Vec::new();
    for &root in transcript.turn_roots() {
        for id in transcript.descendants(root) {
            if let Some(node) = transcript.node(id)
                && node.kind == NodeKind::CodeBlock
            {
                blocks.push(id);
            }
        }
    }
    blocks
}
