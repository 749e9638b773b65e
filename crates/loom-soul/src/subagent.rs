//! The concrete [`SubagentSpawner`] (spec §4.7), deferred here from
//! `loom-runtime` because spawning means running a [`Soul`] to completion.
//!
//! Grounded in `loom_runtime::Runtime`'s bundle of ambient services: a
//! spawned child gets its own [`Context`] (a sibling journal file under the
//! parent session's directory) and its own [`ApprovalMediator`] (YOLO
//! inherited from the parent, per spec §4.7's "subagents do not re-prompt
//! for consent the parent already granted"), but shares the parent's
//! [`ChatProvider`], [`ToolRegistry`], and [`Wire`] (its events arrive
//! wrapped in [`WireMessage::SubagentEvent`]).

use std::sync::Arc;

use loom_compaction::CompactionStrategy;
use loom_context::Context;
use loom_core::SessionId;
use loom_llm::{ChatProvider, ThinkingEffort};
use loom_runtime::LaborMarket;
use loom_tools::{SubagentRequest, SubagentResult, SubagentSpawner, ToolContext, ToolRegistry};
use loom_wire::{Wire, WireMessage};
use tokio_util::sync::CancellationToken;

use crate::config::AgentLoopConfig;
use crate::soul::Soul;

/// The system prompt used when a [`SubagentRequest`] names no template (the
/// `task` tool's schema has no template-name field, so every spawn request
/// falls back to the labor market's `"default"` entry, or this prompt if
/// even that is absent).
const FALLBACK_SYSTEM_PROMPT: &str =
    "You are a subagent delegated a self-contained task. Complete it and report your final answer as plain text.";

/// Spawns a child [`Soul`] sharing the parent's LLM, tool registry, and wire.
pub struct SoulSpawner {
    session_id: SessionId,
    session_dir: std::path::PathBuf,
    llm: Arc<dyn ChatProvider>,
    tools: Arc<ToolRegistry>,
    labor_market: Arc<LaborMarket>,
    compaction: Arc<dyn CompactionStrategy>,
    config: AgentLoopConfig,
    parent_wire: Wire,
    yolo: bool,
}

impl SoulSpawner {
    /// Build a spawner for subagents nested under `session_dir`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_id: SessionId,
        session_dir: std::path::PathBuf,
        llm: Arc<dyn ChatProvider>,
        tools: Arc<ToolRegistry>,
        labor_market: Arc<LaborMarket>,
        compaction: Arc<dyn CompactionStrategy>,
        config: AgentLoopConfig,
        parent_wire: Wire,
        yolo: bool,
    ) -> Self {
        Self {
            session_id,
            session_dir,
            llm,
            tools,
            labor_market,
            compaction,
            config,
            parent_wire,
            yolo,
        }
    }
}

#[async_trait::async_trait]
impl SubagentSpawner for SoulSpawner {
    async fn spawn(&self, request: SubagentRequest) -> Result<SubagentResult, String> {
        let system_prompt = self
            .labor_market
            .get("default")
            .map(|template| template.system_prompt.clone())
            .unwrap_or_else(|| FALLBACK_SYSTEM_PROMPT.to_string());

        let journal_path = self.session_dir.join(format!("subagent-{}.jsonl", uuid::Uuid::new_v4()));
        let context = Context::open(&journal_path)
            .await
            .map_err(|err| format!("failed to open subagent context: {err}"))?;

        let child_wire = Wire::new();
        let relay = spawn_relay(child_wire.clone(), self.parent_wire.clone(), request.label.clone());

        let approval = loom_approval::ApprovalMediator::new(child_wire.clone(), self.yolo);
        let tool_ctx = ToolContext::new(self.session_dir.clone(), approval);

        let mut child = Soul::new(
            context,
            child_wire,
            Arc::clone(&self.llm),
            Arc::clone(&self.tools),
            tool_ctx,
            Arc::clone(&self.compaction),
            self.config,
            system_prompt,
            self.session_id,
        );

        let cancel = CancellationToken::new();
        let input = vec![loom_core::Part::text(request.prompt)];
        let outcome = child.run(input, ThinkingEffort::Off, cancel).await;

        let success = outcome.is_ok().then(|| {
            let last_text = child
                .context()
                .messages()
                .iter()
                .rev()
                .find(|m| m.role == loom_core::Role::Assistant)
                .map(|m| m.text())
                .unwrap_or_default();
            let tool_calls = child.context().messages().iter().filter(|m| m.has_tool_calls()).count();
            (last_text, tool_calls)
        });

        // Dropping the child releases every clone of its wire's sender half
        // (the mediator's listener holds the other), closing the channel so
        // the relay drains whatever is left and exits on its own.
        drop(child);
        let _ = relay.await;

        match (outcome, success) {
            (Ok(()), Some((output, tool_calls))) => Ok(SubagentResult { output, tool_calls }),
            (Err(err), _) => Err(err.to_string()),
            (Ok(()), None) => unreachable!("success is populated whenever outcome is Ok"),
        }
    }
}

/// Forward every message a child wire carries onto the parent wire, each
/// wrapped in [`WireMessage::SubagentEvent`], until the handle is aborted.
fn spawn_relay(child: Wire, parent: Wire, label: String) -> tokio::task::JoinHandle<()> {
    let mut rx = child.subscribe();
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            parent.send(WireMessage::SubagentEvent {
                label: label.clone(),
                inner: Box::new((*message).clone()),
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_compaction::strategies::HidingThenSummaryStrategy;
    use loom_test::{MockLlmProvider, MockTurn};

    #[tokio::test]
    async fn spawns_a_child_and_relays_its_events() {
        let dir = tempfile::tempdir().unwrap();
        let llm = Arc::new(MockLlmProvider::new(vec![MockTurn::text("subagent done")]));
        let parent_wire = Wire::new();
        let mut parent_rx = parent_wire.subscribe();

        let spawner = SoulSpawner::new(
            SessionId::new(),
            dir.path().to_path_buf(),
            llm,
            Arc::new(ToolRegistry::new()),
            Arc::new(LaborMarket::new()),
            Arc::new(HidingThenSummaryStrategy::default()),
            AgentLoopConfig {
                max_context_size: 10_000,
                reserved_context_size: 0,
                ..AgentLoopConfig::default()
            },
            parent_wire,
            true,
        );

        let result = spawner
            .spawn(SubagentRequest {
                label: "investigate".into(),
                prompt: "find the bug".into(),
                timeout: None,
            })
            .await
            .unwrap();
        assert_eq!(result.output, "subagent done");
        assert_eq!(result.tool_calls, 0);

        let mut saw_subagent_event = false;
        while let Some(message) = parent_rx.try_recv() {
            if matches!(message.as_ref(), WireMessage::SubagentEvent { label, .. } if label == "investigate") {
                saw_subagent_event = true;
            }
        }
        assert!(saw_subagent_event);
    }
}
