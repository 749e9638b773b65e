//! Shared context available to built-in tools (spec §4.4, §4.7).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use loom_approval::ApprovalMediator;
use loom_core::CheckpointId;
use tokio::sync::RwLock;

/// A pending D-Mail: a checkpoint to rewind to plus the note to inject
/// (spec §4.6). At most one may be pending per turn.
pub type DMailSlot = Arc<RwLock<Option<(CheckpointId, String)>>>;

/// Request to spawn a subagent, issued by [`crate::builtins::TaskTool`].
///
/// Defined here (not in `loom-runtime`) so this crate does not depend on the
/// runtime crate that implements the spawn; `loom-runtime` depends on this
/// crate instead, avoiding a cycle.
#[derive(Debug, Clone)]
pub struct SubagentRequest {
    /// Short label shown in `SubagentEvent` wrapping on the wire.
    pub label: String,
    /// The instructions handed to the subagent as its sole user message.
    pub prompt: String,
    /// Optional wall-clock timeout; falls back to the spawner's default.
    pub timeout: Option<Duration>,
}

/// Result of a completed subagent run.
#[derive(Debug, Clone)]
pub struct SubagentResult {
    /// The subagent's final assistant text.
    pub output: String,
    /// Number of tool calls the subagent made.
    pub tool_calls: usize,
}

/// Spawns a nested agent loop and waits for it to terminate.
///
/// Implemented by `loom-runtime`'s labor market; injected into
/// [`ToolContext`] by the agent loop before each turn.
#[async_trait]
pub trait SubagentSpawner: Send + Sync {
    /// Spawn a subagent and block until it finishes.
    async fn spawn(&self, request: SubagentRequest) -> Result<SubagentResult, String>;
}

/// Everything a built-in tool's `execute` body may need.
///
/// One instance is constructed per tool call via [`ToolContext::for_call`];
/// clones share the same working-directory cell, approval mediator, and
/// subagent spawner slot.
#[derive(Clone)]
pub struct ToolContext {
    /// The call this context is bound to — approval requests issued from
    /// inside `execute` are attributed to this id.
    pub tool_call_id: String,
    /// Workspace root directory.
    pub workspace_root: PathBuf,
    /// Current working directory, shared across calls within a session.
    pub cwd: Arc<RwLock<PathBuf>>,
    /// The approval mediator tools use to request consent.
    pub approval: ApprovalMediator,
    /// The slot `SendDMailTool` writes into.
    pub dmail: DMailSlot,
    subagent_spawner: Arc<RwLock<Option<Arc<dyn SubagentSpawner>>>>,
}

impl ToolContext {
    /// Construct a fresh context for a session.
    #[must_use]
    pub fn new(workspace_root: PathBuf, approval: ApprovalMediator) -> Self {
        let cwd = Arc::new(RwLock::new(workspace_root.clone()));
        Self {
            tool_call_id: String::new(),
            workspace_root,
            cwd,
            approval,
            dmail: Arc::new(RwLock::new(None)),
            subagent_spawner: Arc::new(RwLock::new(None)),
        }
    }

    /// Clone this context bound to a specific tool call id.
    #[must_use]
    pub fn for_call(&self, tool_call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            ..self.clone()
        }
    }

    /// Install the subagent spawner for the current turn.
    pub async fn set_subagent_spawner(&self, spawner: Option<Arc<dyn SubagentSpawner>>) {
        *self.subagent_spawner.write().await = spawner;
    }

    /// The currently installed subagent spawner, if any.
    pub async fn subagent_spawner(&self) -> Option<Arc<dyn SubagentSpawner>> {
        self.subagent_spawner.read().await.clone()
    }
}
