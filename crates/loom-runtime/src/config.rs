//! The small ambient configuration surface the Runtime bundle carries.
//!
//! Full TOML/JSON config file loading is an external collaborator's job; the
//! struct and its defaults live here so the runtime is constructible
//! standalone and in tests.

use serde::{Deserialize, Serialize};

/// Runtime-level configuration independent of any one turn's numeric knobs
/// (those live in `loom_soul::AgentLoopConfig`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// When set, the approval mediator auto-grants every request without
    /// consulting the wire.
    pub yolo: bool,
    /// The model identifier the configured LLM handle reports, echoed here
    /// for convenience (sessions, logs) without requiring a trait call.
    pub model: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            yolo: false,
            model: String::new(),
        }
    }
}
