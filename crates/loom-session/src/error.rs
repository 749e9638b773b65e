//! Error taxonomy for session directory and metadata handling.

use std::io;

/// Errors raised while resolving or manipulating session state on disk.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A filesystem operation failed.
    #[error("session I/O error: {0}")]
    Io(#[from] io::Error),
    /// A metadata or session record failed to (de)serialize.
    #[error("session metadata corrupt: {0}")]
    Json(#[from] serde_json::Error),
    /// Neither `$LOOM_HOME` nor `$HOME` is set.
    #[error("cannot resolve loom home directory: neither LOOM_HOME nor HOME is set")]
    HomeNotResolvable,
}

/// Convenience alias for this crate's fallible operations.
pub type SessionResult<T> = Result<T, SessionError>;
