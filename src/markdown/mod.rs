//! Pure Markdown generation from the content tree.
//!
//! The design separates pure rendering logic from I/O:
//!
//! - [`escape`]: string transformation utilities (backtick escaping,
//!   blank-run collapsing)
//! - [`render`]: core content tree → Markdown transform
//!
//! The export layer ([`crate::export`]) handles document assembly and
//! file emission, calling these pure functions to generate fragments.

mod escape;
mod render;

pub use escape::{collapse_blank_runs, escape_backticks};
pub use render::{render_children, render_node};
