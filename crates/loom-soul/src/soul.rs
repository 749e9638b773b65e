//! The turn/step state machine (spec §4.6).
//!
//! Grounded in `astrid-runtime::runtime::execution::{run_turn_streaming,
//! run_loop}` for the stream-then-dispatch-tools-then-continue shape,
//! adapted per the Design Note in spec §9: `step()` returns a
//! [`StepOutcome`] instead of throwing `BackToTheFuture`, and the
//! approval-piping task the algorithm sketch spawns per step is instead the
//! listener `loom_approval::ApprovalMediator` already runs for its whole
//! lifetime (spawned once at construction) — respawning it every step would
//! buy no additional cancellation safety the mediator's own timeout
//! doesn't already provide.

use std::sync::{Arc, Mutex};

use loom_compaction::{CompactionContext, CompactionStrategy};
use loom_context::Context;
use loom_core::{Message, Part, Role, SessionId, TurnId};
use loom_llm::{
    ChatProvider, LlmResult, MessagePartSink, StepRequest, StepResult, ThinkingEffort, ToolResultSink, ToolSchema,
};
use loom_tools::{ToolContext, ToolRegistry, dispatch_all};
use loom_wire::{Wire, WireMessage};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::AgentLoopConfig;
use crate::error::{SoulError, SoulResult};
use crate::outcome::StepOutcome;
use crate::retry;

/// One turn's worth of state: a context, the tools/LLM/compaction it
/// orchestrates, and the ambient services it forwards to the wire.
///
/// Owns the [`Context`] and the wire's producer side exclusively, per spec
/// §3's ownership summary. Not `Clone` — one `Soul` drives one session's
/// turns sequentially; subagents get their own (see `crate::subagent`).
pub struct Soul {
    context: Context,
    wire: Wire,
    llm: Arc<dyn ChatProvider>,
    tools: Arc<ToolRegistry>,
    tool_ctx: ToolContext,
    compaction: Arc<dyn CompactionStrategy>,
    config: AgentLoopConfig,
    system_prompt: String,
    session_id: SessionId,
}

impl Soul {
    /// Assemble a soul from its already-constructed collaborators.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: Context,
        wire: Wire,
        llm: Arc<dyn ChatProvider>,
        tools: Arc<ToolRegistry>,
        tool_ctx: ToolContext,
        compaction: Arc<dyn CompactionStrategy>,
        config: AgentLoopConfig,
        system_prompt: impl Into<String>,
        session_id: SessionId,
    ) -> Self {
        Self {
            context,
            wire,
            llm,
            tools,
            tool_ctx,
            compaction,
            config,
            system_prompt: system_prompt.into(),
            session_id,
        }
    }

    /// The journal-backed history this turn operates on.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Run one turn to completion: `run(user_input)` (spec §4.6).
    ///
    /// `input` is the user's message content; a plain-text turn passes a
    /// single [`Part::Text`]. Slash-command dispatch is not implemented
    /// here — it is a UI/CLI-shell concern external to this crate per
    /// spec §1's scope list, so every input reaches the loop as ordinary
    /// chat.
    pub async fn run(&mut self, input: Vec<Part>, thinking_effort: ThinkingEffort, cancel: CancellationToken) -> SoulResult<()> {
        let turn_id = TurnId::new();
        self.wire.send(WireMessage::TurnBegin {
            session_id: self.session_id,
            turn_id,
            input: concat_text(&input),
        });

        let capabilities = self.llm.capabilities();
        if !capabilities.image_in && input.iter().any(|part| matches!(part, Part::Image { .. })) {
            return Err(SoulError::LlmNotSupported {
                model: self.llm.model().to_string(),
                capability: "image_in",
            });
        }

        self.context.checkpoint().await?;
        self.context.append_message(Message { role: Role::User, parts: input }).await?;
        self.context.commit().await?;

        self.agent_loop(thinking_effort, &cancel).await?;
        self.wire.send(WireMessage::TurnEnd);
        Ok(())
    }

    /// `_agent_loop()` (spec §4.6): the step/retry/compaction/D-Mail state
    /// machine driving one turn.
    async fn agent_loop(&mut self, thinking_effort: ThinkingEffort, cancel: &CancellationToken) -> SoulResult<()> {
        let mut step_no: u32 = 0;
        loop {
            step_no += 1;
            if step_no > self.config.max_steps_per_run {
                return Err(SoulError::MaxStepsReached {
                    step_no,
                    max: self.config.max_steps_per_run,
                });
            }
            self.wire.send(WireMessage::StepBegin { step_no });

            match self.run_one_step(thinking_effort, cancel).await {
                Ok(StepOutcome::Finished) => return Ok(()),
                Ok(StepOutcome::Continue) => continue,
                Ok(StepOutcome::BackToTheFuture { checkpoint_id, message }) => {
                    self.context.revert_to(checkpoint_id).await?;
                    self.context.checkpoint().await?;
                    self.context.append_message(Message::system(message)).await?;
                    self.context.commit().await?;
                    continue;
                },
                Err(err) => {
                    let reason = if matches!(err, SoulError::RunCancelled) {
                        "cancelled".to_string()
                    } else {
                        err.to_string()
                    };
                    self.wire.send(WireMessage::StepInterrupted { reason });
                    return Err(err);
                },
            }
        }
    }

    async fn run_one_step(&mut self, thinking_effort: ThinkingEffort, cancel: &CancellationToken) -> SoulResult<StepOutcome> {
        if self.context.token_count() + self.config.reserved_context_size >= self.config.max_context_size {
            self.run_compaction().await?;
        }
        self.context.checkpoint().await?;
        self.step(thinking_effort, cancel).await
    }

    /// `step()` (spec §4.6): one LLM call plus its tool executions.
    async fn step(&mut self, thinking_effort: ThinkingEffort, cancel: &CancellationToken) -> SoulResult<StepOutcome> {
        let toolset_schema = self.tools.schemas();
        let history = self.context.messages().to_vec();
        let stream_id = Uuid::new_v4().to_string();

        let collected: Arc<Mutex<Vec<Part>>> = Arc::new(Mutex::new(Vec::new()));
        let on_message_part = forwarding_sink(self.wire.clone(), stream_id.clone(), Arc::clone(&collected));
        let on_tool_result: ToolResultSink = Arc::new(|_message: &Message| {});

        // The LLM call is the only cancellation-observable point in a
        // step: once tool calls are dispatched, the append-to-journal tail
        // is shielded so a cancelled turn never leaves an assistant tool
        // call without its tool messages (spec §5, invariant 8).
        let step_result: StepResult = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(SoulError::RunCancelled),
            result = self.call_step_with_retry(thinking_effort, &toolset_schema, &history, on_message_part, on_tool_result) => result?,
        };

        let context_usage = if self.config.max_context_size > 0 {
            step_result.usage.prompt_tokens as f32 / self.config.max_context_size as f32
        } else {
            0.0
        };
        self.wire.send(WireMessage::StatusUpdate {
            token_usage: step_result.usage.prompt_tokens,
            message_id: step_result.assistant_message_id.clone(),
            context_usage,
        });
        self.context.update_token_count(step_result.usage.prompt_tokens).await?;

        let outcomes = dispatch_all(&self.tools, &self.wire, &self.tool_ctx, &step_result.tool_calls).await;
        for outcome in &outcomes {
            step_result.results().report(outcome.message.clone()).await;
        }
        let _ = step_result.tool_results().await;

        let mut assistant_parts = std::mem::take(&mut *collected.lock().expect("lock poisoned"));
        for tool_call in &step_result.tool_calls {
            assistant_parts.push(Part::ToolCall {
                id: tool_call.id.clone(),
                name: tool_call.name.clone(),
                arguments: tool_call.arguments.clone(),
            });
        }
        let assistant_message = Message {
            role: Role::Assistant,
            parts: assistant_parts,
        };
        let has_tool_calls = assistant_message.has_tool_calls();

        self.context.append_message(assistant_message).await?;
        let any_rejected = outcomes.iter().any(|outcome| outcome.rejected);
        for outcome in outcomes {
            self.context.append_message(outcome.message).await?;
        }
        self.context.commit().await?;

        if any_rejected {
            self.tool_ctx.dmail.write().await.take();
            return Ok(StepOutcome::Finished);
        }
        if let Some((checkpoint_id, message)) = self.tool_ctx.dmail.write().await.take() {
            return Ok(StepOutcome::BackToTheFuture { checkpoint_id, message });
        }
        Ok(if has_tool_calls { StepOutcome::Continue } else { StepOutcome::Finished })
    }

    /// Call the provider under the step's retry policy: exponential
    /// backoff with jitter, retried only for
    /// [`loom_llm::LlmError::Transient`], up to `max_retries_per_step`.
    async fn call_step_with_retry(
        &self,
        thinking_effort: ThinkingEffort,
        toolset_schema: &[ToolSchema],
        history: &[Message],
        on_message_part: MessagePartSink,
        on_tool_result: ToolResultSink,
    ) -> LlmResult<StepResult> {
        let mut attempt = 0u32;
        loop {
            let request = StepRequest {
                system_prompt: &self.system_prompt,
                toolset_schema,
                history,
                thinking_effort,
            };
            match self.llm.step(request, on_message_part.clone(), on_tool_result.clone()).await {
                Ok(result) => return Ok(result),
                Err(err) if err.is_transient() && attempt < self.config.max_retries_per_step => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %err, "transient chat-provider error, retrying");
                    tokio::time::sleep(retry::backoff_delay(attempt)).await;
                },
                Err(err) => return Err(err),
            }
        }
    }

    /// Trigger condition and call-site for compaction (spec §4.5).
    async fn run_compaction(&mut self) -> SoulResult<()> {
        self.wire.send(WireMessage::CompactionBegin);
        let before = self.context.messages().len();

        let new_history = {
            let ctx = CompactionContext {
                history: self.context.messages(),
                token_count: self.context.token_count(),
                max_context_size: self.config.max_context_size,
                reserved_context_size: self.config.reserved_context_size,
                llm: self.llm.as_ref(),
            };
            self.compaction.compact(ctx).await
        };
        if let Some(new_history) = new_history {
            self.context.compact(new_history).await?;
        }

        let after = self.context.messages().len();
        self.wire.send(WireMessage::CompactionEnd {
            messages_before: before,
            messages_after: after,
        });
        Ok(())
    }
}

/// Build the callback `ChatProvider::step` invokes per streamed part:
/// forwards text/thinking deltas and tool-call announcements to the wire,
/// and buffers text/thinking/image parts (in arrival order) so the final
/// assistant message can be reconstructed once the step completes.
fn forwarding_sink(wire: Wire, stream_id: String, collected: Arc<Mutex<Vec<Part>>>) -> MessagePartSink {
    Arc::new(move |part: Part| {
        match &part {
            Part::Text { text } => wire.send(WireMessage::TextPart {
                message_id: stream_id.clone(),
                delta: text.clone(),
            }),
            Part::Thinking { text } => wire.send(WireMessage::ThinkPart {
                message_id: stream_id.clone(),
                delta: text.clone(),
            }),
            // Tool calls are announced on the wire by `dispatch_all`
            // instead, in the calls' declared order rather than stream
            // arrival order.
            Part::ToolCall { .. } | Part::Image { .. } | Part::ToolResult { .. } => {},
        }
        if matches!(part, Part::Text { .. } | Part::Thinking { .. }) {
            collected.lock().expect("lock poisoned").push(part);
        }
    })
}

fn concat_text(parts: &[Part]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}
