//! Errors raised by the context store.

use loom_core::CheckpointId;
use thiserror::Error;

/// Errors from [`crate::Context`] operations.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The journal file could not be opened for reading or appending.
    #[error("failed to open journal at {path}: {source}")]
    Open {
        /// The journal path.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A write (append or fsync) to the journal failed.
    #[error("journal write failed: {0}")]
    Write(#[source] std::io::Error),

    /// `revert_to` was called with a checkpoint id that was never issued.
    #[error("unknown checkpoint id {0}")]
    UnknownCheckpoint(CheckpointId),
}

/// Convenience alias for context-store results.
pub type ContextResult<T> = Result<T, ContextError>;
