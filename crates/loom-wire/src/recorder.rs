//! Optional file recorder: subscribes once, writes every message to
//! `wire.jsonl` (spec §4.1, §6).

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::bus::Wire;

/// Errors opening the recorder's backing file.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The backing file could not be opened.
    #[error("failed to open wire recording file {path}: {source}")]
    Open {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Subscribes to a [`Wire`] and appends every message as one JSON line to a
/// file. Write failures are logged and otherwise swallowed: a broken
/// recorder must never affect the turn it is observing.
pub struct WireRecorder {
    file: tokio::fs::File,
}

impl WireRecorder {
    /// Open (creating if necessary, appending if it exists) the recording
    /// file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Open`] if the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RecorderError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|source| RecorderError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { file })
    }

    /// Run the recorder loop until the wire is closed. Intended to be
    /// `tokio::spawn`ed once per session.
    pub async fn run(mut self, wire: &Wire) {
        let mut rx = wire.subscribe();
        while let Some(msg) = rx.recv().await {
            if let Err(err) = self.write_line(&msg).await {
                warn!(%err, "wire recorder write failed, continuing");
            }
        }
    }

    async fn write_line(&mut self, msg: &crate::message::WireMessage) -> std::io::Result<()> {
        let mut line = serde_json::to_vec(msg).unwrap_or_default();
        line.push(b'\n');
        self.file.write_all(&line).await
    }
}
