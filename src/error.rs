//! Error types for export operations.

use thiserror::Error;

/// Errors that can occur while exporting a transcript.
#[derive(Error, Debug)]
pub enum Error {
    /// Turn discovery produced nothing serializable. The only recoverable
    /// condition surfaced to the caller; no file is emitted.
    #[error("no conversation turns found")]
    NoTurns,

    /// An export was requested while another was still in flight.
    /// Overlapping exports are rejected, not queued.
    #[error("an export is already in progress")]
    ExportInFlight,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

pub type Result<T> = std::result::Result<T, Error>;
