//! The `context.jsonl` line format (spec §6) and its file-backed writer.
//!
//! One JSON object per line, discriminated by a `role` field: `_checkpoint`,
//! `_usage`, or a regular [`Role`](loom_core::Role) value. Readers must
//! ignore unknown `role` values (forward compatibility); writers must fsync
//! at step-commit boundaries.

use std::path::Path;

use loom_core::{CheckpointId, Message, Part, Role};
use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use crate::error::{ContextError, ContextResult};

/// One physical line of `context.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role")]
pub(crate) enum JournalLine {
    /// A checkpoint marker.
    #[serde(rename = "_checkpoint")]
    Checkpoint {
        /// The checkpoint id.
        id: CheckpointId,
    },
    /// A token-usage record.
    #[serde(rename = "_usage")]
    Usage {
        /// The reported prompt-token count.
        token_count: u64,
    },
    /// A compaction marker: every message preceding it in the journal is
    /// superseded by whatever regular message lines follow, up to the next
    /// `_compact`/restart of the file. Checkpoint ids issued before this
    /// marker no longer resolve (their prefix lengths refer to history that
    /// no longer exists).
    #[serde(rename = "_compact")]
    Compact,
    /// A user message.
    #[serde(rename = "user")]
    User {
        /// Message content parts.
        parts: Vec<Part>,
    },
    /// An assistant message.
    #[serde(rename = "assistant")]
    Assistant {
        /// Message content parts.
        parts: Vec<Part>,
    },
    /// A tool message.
    #[serde(rename = "tool")]
    Tool {
        /// Message content parts.
        parts: Vec<Part>,
    },
    /// A system message.
    #[serde(rename = "system")]
    System {
        /// Message content parts.
        parts: Vec<Part>,
    },
}

impl JournalLine {
    pub(crate) fn from_message(msg: &Message) -> Self {
        let parts = msg.parts.clone();
        match msg.role {
            Role::User => Self::User { parts },
            Role::Assistant => Self::Assistant { parts },
            Role::Tool => Self::Tool { parts },
            Role::System => Self::System { parts },
        }
    }

    pub(crate) fn into_message(self) -> Option<Message> {
        let (role, parts) = match self {
            Self::User { parts } => (Role::User, parts),
            Self::Assistant { parts } => (Role::Assistant, parts),
            Self::Tool { parts } => (Role::Tool, parts),
            Self::System { parts } => (Role::System, parts),
            Self::Checkpoint { .. } | Self::Usage { .. } | Self::Compact => return None,
        };
        Some(Message { role, parts })
    }
}

/// The on-disk journal: an append-only file of [`JournalLine`]s.
pub(crate) struct Journal {
    file: File,
}

impl Journal {
    /// Open (creating if necessary) the journal at `path` for appending.
    pub(crate) async fn open(path: impl AsRef<Path>) -> ContextResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| ContextError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self { file })
    }

    pub(crate) async fn append(&mut self, line: &JournalLine) -> ContextResult<()> {
        let mut buf = serde_json::to_vec(line).expect("JournalLine always serializes");
        buf.push(b'\n');
        self.file.write_all(&buf).await.map_err(ContextError::Write)
    }

    /// fsync the journal file (spec: "Writers MUST fsync at end-of-step").
    pub(crate) async fn commit(&mut self) -> ContextResult<()> {
        self.file.sync_all().await.map_err(ContextError::Write)
    }

    /// Read every valid line from the journal at `path`, in order.
    ///
    /// A truncated (non-JSON) final line is discarded with a warning rather
    /// than treated as a hard error (spec §7: `JournalCorruption`).
    pub(crate) async fn read_all(path: impl AsRef<Path>) -> ContextResult<Vec<JournalLine>> {
        let path = path.as_ref();
        let file = match File::open(path).await {
            Ok(f) => f,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ContextError::Open {
                    path: path.to_path_buf(),
                    source,
                });
            },
        };
        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        let mut buf = String::new();
        loop {
            buf.clear();
            let read = reader.read_line(&mut buf).await.map_err(ContextError::Write)?;
            if read == 0 {
                break;
            }
            let trimmed = buf.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<JournalLine>(trimmed) {
                Ok(line) => lines.push(line),
                Err(err) => {
                    warn!(%err, "discarding truncated/corrupt journal tail");
                    break;
                },
            }
        }
        Ok(lines)
    }
}
