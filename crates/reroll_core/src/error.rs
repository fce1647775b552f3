//! Error types for the reset pipeline
//!
//! Every fallible step maps onto one variant here so the CLI can pick
//! an exit code without string-matching messages.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the reset pipeline
///
/// v0.4.0: `ProcessQueryFailed` split out of `Io` so a broken process
/// table is never mistaken for "nothing is running".
#[derive(Debug, Error)]
pub enum ResetError {
    /// None of the known install paths exist on this machine
    #[error("no Cursor installation found at any known install path")]
    NotInstalled,

    /// The running OS is not in the platform lookup table
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Enumerating live processes failed outright
    #[error("process query failed: {0}")]
    ProcessQueryFailed(String),

    /// Matching processes survived the kill pass and the settle delay
    #[error("Cursor is still running after kill ({remaining} matching process(es) left)")]
    StillRunning { remaining: usize },

    /// Asked to back up a file that does not exist
    #[error("backup source does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The updater directory could not be replaced with a placeholder
    #[error("could not disable the updater: {0}")]
    SuppressFailed(#[source] std::io::Error),

    /// Filesystem error outside the cases above
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage document could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
