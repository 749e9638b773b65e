//! The environment descriptor named in the Runtime bundle (spec §3): OS
//! family, shell, and working directory.

use std::path::{Path, PathBuf};

/// Describes the host the agent loop is running on.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Environment {
    /// `std::env::consts::OS` (`"linux"`, `"macos"`, `"windows"`, ...).
    pub os: String,
    /// The user's shell, e.g. `/bin/zsh`. Falls back to `/bin/sh` on Unix or
    /// `cmd.exe` on Windows if `$SHELL` is unset.
    pub shell: String,
    /// The working directory the session is bound to.
    pub working_directory: PathBuf,
}

impl Environment {
    /// Detect the environment for a given working directory.
    #[must_use]
    pub fn detect(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            shell: detect_shell(),
            working_directory: working_directory.into(),
        }
    }

    /// The working directory as a borrowed path.
    #[must_use]
    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }
}

fn detect_shell() -> String {
    if let Ok(shell) = std::env::var("SHELL") {
        if !shell.is_empty() {
            return shell;
        }
    }
    if cfg!(windows) {
        "cmd.exe".to_string()
    } else {
        "/bin/sh".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_reports_the_requested_working_directory() {
        let env = Environment::detect("/tmp/project");
        assert_eq!(env.working_directory(), Path::new("/tmp/project"));
        assert!(!env.os.is_empty());
        assert!(!env.shell.is_empty());
    }
}
