//! The chat-provider contract (spec §6): `chat_provider.step(system_prompt,
//! toolset_schema, history, thinking_effort, on_message_part, on_tool_result)
//! → StepResult { assistant_message_id, usage, tool_calls, tool_results() }`.
//!
//! The core treats a provider as opaque. It requires only that
//! `on_message_part` is invoked for each streamed part in order, and that
//! [`StepResult::tool_results`] resolves once every tool call the step
//! requested has been reported back via [`ToolResults::report`].

use std::sync::Arc;

use async_trait::async_trait;
use loom_core::Part;
use tokio::sync::{Mutex, Notify};

use crate::error::LlmResult;
use crate::types::{ProviderCapabilities, ThinkingEffort, ToolCallRequest, ToolSchema, Usage};

/// Callback invoked once per streamed message part, in the order the
/// provider produced them.
pub type MessagePartSink = Arc<dyn Fn(Part) + Send + Sync>;

/// Callback a provider may use to observe each tool result as the agent loop
/// records it. Providers that do not need to see intermediate tool results
/// (the common case) simply ignore it.
pub type ToolResultSink = Arc<dyn Fn(&loom_core::Message) + Send + Sync>;

/// The inputs to one [`ChatProvider::step`] call.
pub struct StepRequest<'a> {
    /// The system prompt for this turn.
    pub system_prompt: &'a str,
    /// The toolset schema offered to the model.
    pub toolset_schema: &'a [ToolSchema],
    /// The conversation history so far.
    pub history: &'a [loom_core::Message],
    /// Requested reasoning effort.
    pub thinking_effort: ThinkingEffort,
}

/// An LLM backend the agent loop drives one step at a time.
///
/// Vendor-specific wire protocols (Anthropic, OpenAI, etc.) are out of scope
/// for this crate; implementors adapt them to this contract.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// A short name for logging.
    fn name(&self) -> &str;

    /// The model identifier in use.
    fn model(&self) -> &str;

    /// What this model supports.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Rough token count for budgeting (default: ~4 characters per token).
    fn count_tokens(&self, text: &str) -> u64 {
        (text.len() as u64) / 4
    }

    /// Run one step: stream the model's response, invoking `on_message_part`
    /// for each part, and return the assistant's tool calls (if any) plus a
    /// handle the caller resolves as those tool calls complete.
    async fn step(
        &self,
        request: StepRequest<'_>,
        on_message_part: MessagePartSink,
        on_tool_result: ToolResultSink,
    ) -> LlmResult<StepResult>;
}

/// The result of one [`ChatProvider::step`] call.
pub struct StepResult {
    /// Id of the assistant message the provider produced.
    pub assistant_message_id: String,
    /// Reported token usage.
    pub usage: Usage,
    /// Tool calls requested by the assistant, in declared order.
    pub tool_calls: Vec<ToolCallRequest>,
    results: ToolResults,
}

impl StepResult {
    /// Build a step result expecting `tool_calls.len()` eventual reports.
    #[must_use]
    pub fn new(
        assistant_message_id: impl Into<String>,
        usage: Usage,
        tool_calls: Vec<ToolCallRequest>,
        on_tool_result: ToolResultSink,
    ) -> Self {
        let results = ToolResults::new(tool_calls.len(), on_tool_result);
        Self {
            assistant_message_id: assistant_message_id.into(),
            usage,
            tool_calls,
            results,
        }
    }

    /// The shared handle the caller reports completed tool results into.
    #[must_use]
    pub fn results(&self) -> &ToolResults {
        &self.results
    }

    /// Await every tool call's result. Resolves immediately if this step had
    /// no tool calls.
    pub async fn tool_results(&self) -> Vec<loom_core::Message> {
        self.results.wait().await
    }
}

/// Shared, clonable handle used to report tool results back into a
/// [`StepResult`] as they complete.
#[derive(Clone)]
pub struct ToolResults {
    expected: usize,
    state: Arc<Mutex<Vec<loom_core::Message>>>,
    notify: Arc<Notify>,
    on_tool_result: ToolResultSink,
}

impl ToolResults {
    fn new(expected: usize, on_tool_result: ToolResultSink) -> Self {
        Self {
            expected,
            state: Arc::new(Mutex::new(Vec::with_capacity(expected))),
            notify: Arc::new(Notify::new()),
            on_tool_result,
        }
    }

    /// Report one tool call's completed result.
    pub async fn report(&self, message: loom_core::Message) {
        (self.on_tool_result)(&message);
        let mut state = self.state.lock().await;
        state.push(message);
        if state.len() >= self.expected {
            self.notify.notify_waiters();
        }
    }

    /// Wait until every expected result has been reported, then return them
    /// in arrival order.
    pub async fn wait(&self) -> Vec<loom_core::Message> {
        loop {
            // Register for the next notification before checking state, so a
            // `notify_waiters` that lands between the check and the await is
            // never missed.
            let notified = self.notify.notified();
            {
                let state = self.state.lock().await;
                if state.len() >= self.expected {
                    return state.clone();
                }
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_core::Message;

    #[tokio::test]
    async fn wait_resolves_immediately_with_no_tool_calls() {
        let result = StepResult::new("m1", Usage::default(), vec![], Arc::new(|_| {}));
        assert!(result.tool_results().await.is_empty());
    }

    #[tokio::test]
    async fn wait_resolves_after_every_call_is_reported() {
        let tool_calls = vec![
            ToolCallRequest {
                id: "call_1".into(),
                name: "shell".into(),
                arguments: serde_json::json!({}),
            },
            ToolCallRequest {
                id: "call_2".into(),
                name: "shell".into(),
                arguments: serde_json::json!({}),
            },
        ];
        let result = StepResult::new("m1", Usage::default(), tool_calls, Arc::new(|_| {}));
        let results = result.results().clone();

        let waiter = tokio::spawn(async move { result.tool_results().await });
        results.report(Message::tool_result("call_1", "a", false)).await;
        results.report(Message::tool_result("call_2", "b", false)).await;

        let resolved = waiter.await.unwrap();
        assert_eq!(resolved.len(), 2);
    }
}
