//! Global Loom home directory resolution (`~/.loom/` or `$LOOM_HOME`).

use std::path::{Path, PathBuf};

use crate::error::{SessionError, SessionResult};

/// Global home directory holding every session and the per-workdir metadata
/// store. Mirrors the layout of a typical CLI agent's state directory: only
/// the pieces this crate owns (sessions, metadata) are modeled here.
#[derive(Debug, Clone)]
pub struct LoomHome {
    root: PathBuf,
}

impl LoomHome {
    /// Resolve the home directory.
    ///
    /// Checks `$LOOM_HOME` first, then falls back to `$HOME/.loom/`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::HomeNotResolvable`] if neither is set.
    pub fn resolve() -> SessionResult<Self> {
        let root = if let Ok(custom) = std::env::var("LOOM_HOME") {
            PathBuf::from(custom)
        } else {
            let home = std::env::var("HOME").map_err(|_| SessionError::HomeNotResolvable)?;
            PathBuf::from(home).join(".loom")
        };
        Ok(Self { root })
    }

    /// Build from an explicit path, bypassing environment resolution (tests,
    /// embedders with their own directory conventions).
    #[must_use]
    pub fn from_path(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create `sessions/` if it doesn't exist yet.
    pub fn ensure(&self) -> SessionResult<()> {
        std::fs::create_dir_all(self.sessions_dir())?;
        Ok(())
    }

    /// Root directory path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sessions directory (`~/.loom/sessions/`).
    #[must_use]
    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }

    /// Path to the per-workdir metadata store (a single file outside any
    /// per-session directory, per spec §4.8).
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.root.join("workdirs.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_creates_the_sessions_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let home = LoomHome::from_path(tmp.path());
        home.ensure().unwrap();
        assert!(home.sessions_dir().is_dir());
    }
}
