//! Per-workdir metadata: last session id and sticky thinking mode (spec §4.8).

use std::collections::HashMap;
use std::path::Path;

use loom_core::SessionId;
use loom_llm::ThinkingEffort;
use serde::{Deserialize, Serialize};

use crate::error::SessionResult;
use crate::paths::LoomHome;
use crate::session::hash12;

/// What's remembered about a working directory between invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkdirMetadata {
    /// The most recently used session id for this working directory.
    pub last_session_id: Option<SessionId>,
    /// Thinking effort sticks across turns once set, until changed.
    pub sticky_thinking_effort: Option<ThinkingEffort>,
}

/// A single-file store mapping `hash12(workdir) -> WorkdirMetadata`, kept
/// outside any per-session directory.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MetadataStore {
    workdirs: HashMap<String, WorkdirMetadata>,
}

impl MetadataStore {
    /// Load the store from `home`'s metadata file, or start empty if it
    /// doesn't exist yet.
    pub fn load(home: &LoomHome) -> SessionResult<Self> {
        let path = home.metadata_path();
        match std::fs::read(&path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the whole store back to `home`'s metadata file.
    pub fn save(&self, home: &LoomHome) -> SessionResult<()> {
        home.ensure()?;
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(home.metadata_path(), bytes)?;
        Ok(())
    }

    /// Look up the metadata for a working directory.
    #[must_use]
    pub fn get(&self, workdir: &Path) -> WorkdirMetadata {
        self.workdirs.get(&hash12(workdir)).cloned().unwrap_or_default()
    }

    /// Replace the metadata for a working directory.
    pub fn set(&mut self, workdir: &Path, metadata: WorkdirMetadata) {
        self.workdirs.insert(hash12(workdir), metadata);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let home = LoomHome::from_path(tmp.path());
        let workdir = tmp.path().join("project");

        let mut store = MetadataStore::load(&home).unwrap();
        assert!(store.get(&workdir).last_session_id.is_none());

        let id = SessionId::new();
        store.set(
            &workdir,
            WorkdirMetadata {
                last_session_id: Some(id),
                sticky_thinking_effort: Some(ThinkingEffort::High),
            },
        );
        store.save(&home).unwrap();

        let reloaded = MetadataStore::load(&home).unwrap();
        let meta = reloaded.get(&workdir);
        assert_eq!(meta.last_session_id, Some(id));
        assert_eq!(meta.sticky_thinking_effort, Some(ThinkingEffort::High));
    }

    #[test]
    fn unknown_workdir_returns_default_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let home = LoomHome::from_path(tmp.path());
        let store = MetadataStore::load(&home).unwrap();
        let meta = store.get(Path::new("/never/seen"));
        assert!(meta.last_session_id.is_none());
        assert!(meta.sticky_thinking_effort.is_none());
    }
}
