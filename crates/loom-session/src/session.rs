//! Session directory layout: `sessions/<hash12(workdir)>/<session_id>/` (spec §4.8).

use std::path::{Path, PathBuf};

use loom_core::SessionId;

use crate::error::SessionResult;
use crate::paths::LoomHome;

/// First 12 hex characters of the `BLAKE3` hash of the working directory's
/// canonical, absolute path. Used to bucket sessions by project.
#[must_use]
pub fn hash12(workdir: &Path) -> String {
    let absolute = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
    let digest = blake3::hash(absolute.to_string_lossy().as_bytes());
    digest.to_hex()[..12].to_string()
}

/// A session bound to a working directory, owning a directory under the
/// Loom home containing `context.jsonl` and `wire.jsonl`.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    workdir: PathBuf,
    dir: PathBuf,
}

impl Session {
    /// Create a fresh session for `workdir`, allocating a new id and the
    /// on-disk directory.
    pub fn create(home: &LoomHome, workdir: impl Into<PathBuf>) -> SessionResult<Self> {
        Self::with_id(home, workdir, SessionId::new())
    }

    /// Build (and ensure on disk) the session directory for a specific,
    /// already-known id — used when resuming a session from metadata.
    pub fn with_id(home: &LoomHome, workdir: impl Into<PathBuf>, id: SessionId) -> SessionResult<Self> {
        let workdir = workdir.into();
        let bucket = hash12(&workdir);
        let dir = home.sessions_dir().join(bucket).join(id.to_string());
        std::fs::create_dir_all(&dir)?;
        Ok(Self { id, workdir, dir })
    }

    /// The session's id.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The working directory this session is bound to.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// The session's own directory (`sessions/<hash12>/<id>/`).
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path to the context journal (`loom-context`'s append-only log).
    #[must_use]
    pub fn context_path(&self) -> PathBuf {
        self.dir.join("context.jsonl")
    }

    /// Path to the wire recorder's output (`loom-wire`'s `WireRecorder`).
    #[must_use]
    pub fn wire_path(&self) -> PathBuf {
        self.dir.join("wire.jsonl")
    }
}
