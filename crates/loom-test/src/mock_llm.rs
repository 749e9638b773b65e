//! A deterministic, queue-based [`ChatProvider`] for exercising the agent
//! loop without a real vendor backend.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use loom_core::{Message, Part};
use loom_llm::{
    ChatProvider, LlmError, LlmResult, MessagePartSink, ProviderCapabilities, StepRequest, StepResult,
    ToolCallRequest, ToolResultSink, Usage,
};
use serde_json::Value;
use uuid::Uuid;

/// A single scripted turn the mock provider replays on the next [`step`](ChatProvider::step) call.
#[derive(Debug, Clone)]
pub enum MockTurn {
    /// Respond with plain assistant text and no tool calls.
    Text {
        /// The assistant's full text response.
        text: String,
        /// Override reported usage; defaults to a small nonzero value.
        usage: Option<Usage>,
    },
    /// Respond with one or more tool calls.
    ToolCalls {
        /// The calls to emit, in declared order.
        calls: Vec<MockToolCall>,
        /// Override reported usage; defaults to a small nonzero value.
        usage: Option<Usage>,
    },
    /// Fail the step.
    Error {
        /// The error to return.
        error: MockError,
    },
}

impl MockTurn {
    /// A text turn with default usage.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            usage: None,
        }
    }

    /// A tool-calls turn with default usage.
    #[must_use]
    pub fn tool_calls(calls: Vec<MockToolCall>) -> Self {
        Self::ToolCalls { calls, usage: None }
    }
}

/// A scripted error a [`MockTurn::Error`] returns.
#[derive(Debug, Clone)]
pub enum MockError {
    /// A transient, retriable failure (5xx, timeout, empty response).
    Transient(String),
    /// A fatal, non-retriable failure.
    Fatal(String),
}

/// One tool call specification for [`MockTurn::ToolCalls`].
#[derive(Debug, Clone)]
pub struct MockToolCall {
    /// The call id, echoed back on the eventual tool result.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Arguments to hand the tool.
    pub arguments: Value,
}

impl MockToolCall {
    /// A new mock tool call with an auto-generated id.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: format!("mock-call-{}", Uuid::new_v4()),
            name: name.into(),
            arguments,
        }
    }

    /// A new mock tool call with an explicit id.
    #[must_use]
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A [`ChatProvider`] that replays a fixed queue of [`MockTurn`]s.
///
/// Each call to [`step`](ChatProvider::step) pops the next turn; an empty
/// queue is a test bug (panics with a clear message rather than a confusing
/// downstream failure).
pub struct MockLlmProvider {
    turns: Mutex<VecDeque<MockTurn>>,
    call_count: Mutex<usize>,
    captured_histories: Mutex<Vec<Vec<Message>>>,
    capabilities: ProviderCapabilities,
}

impl MockLlmProvider {
    /// Build a provider preloaded with the given turns, in replay order.
    #[must_use]
    pub fn new(turns: Vec<MockTurn>) -> Self {
        Self {
            turns: Mutex::new(VecDeque::from(turns)),
            call_count: Mutex::new(0),
            captured_histories: Mutex::new(Vec::new()),
            capabilities: ProviderCapabilities::default(),
        }
    }

    /// Build a provider that also reports `image_in` support.
    #[must_use]
    pub fn with_image_support(mut self) -> Self {
        self.capabilities.image_in = true;
        self
    }

    /// Number of `step` calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().expect("lock poisoned")
    }

    /// A snapshot of the history passed on each call, in call order.
    #[must_use]
    pub fn captured_histories(&self) -> Vec<Vec<Message>> {
        self.captured_histories.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl ChatProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }

    async fn step(
        &self,
        request: StepRequest<'_>,
        on_message_part: MessagePartSink,
        on_tool_result: ToolResultSink,
    ) -> LlmResult<StepResult> {
        *self.call_count.lock().expect("lock poisoned") += 1;
        self.captured_histories
            .lock()
            .expect("lock poisoned")
            .push(request.history.to_vec());

        let turn = self
            .turns
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .expect("MockLlmProvider turn queue exhausted: script more turns than the loop consumed");

        match turn {
            MockTurn::Text { text, usage } => {
                on_message_part(Part::text(text));
                Ok(StepResult::new(
                    format!("mock-msg-{}", Uuid::new_v4()),
                    usage.unwrap_or(Usage {
                        prompt_tokens: 10,
                        completion_tokens: 5,
                    }),
                    vec![],
                    on_tool_result,
                ))
            },
            MockTurn::ToolCalls { calls, usage } => {
                let tool_calls = calls
                    .into_iter()
                    .map(|call| {
                        let part = Part::ToolCall {
                            id: call.id.clone(),
                            name: call.name.clone(),
                            arguments: call.arguments.clone(),
                        };
                        on_message_part(part);
                        ToolCallRequest {
                            id: call.id,
                            name: call.name,
                            arguments: call.arguments,
                        }
                    })
                    .collect();
                Ok(StepResult::new(
                    format!("mock-msg-{}", Uuid::new_v4()),
                    usage.unwrap_or(Usage {
                        prompt_tokens: 10,
                        completion_tokens: 5,
                    }),
                    tool_calls,
                    on_tool_result,
                ))
            },
            MockTurn::Error {
                error: MockError::Transient(message),
            } => Err(LlmError::Transient(message)),
            MockTurn::Error {
                error: MockError::Fatal(message),
            } => Err(LlmError::Fatal(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn replays_turns_in_order_and_counts_calls() {
        let provider = MockLlmProvider::new(vec![MockTurn::text("hi"), MockTurn::text("bye")]);
        let request = StepRequest {
            system_prompt: "",
            toolset_schema: &[],
            history: &[],
            thinking_effort: loom_llm::ThinkingEffort::Off,
        };
        let first = provider
            .step(
                StepRequest {
                    system_prompt: request.system_prompt,
                    toolset_schema: request.toolset_schema,
                    history: request.history,
                    thinking_effort: request.thinking_effort,
                },
                Arc::new(|_| {}),
                Arc::new(|_| {}),
            )
            .await
            .unwrap();
        assert_eq!(first.assistant_message_id.starts_with("mock-msg-"), true);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    #[should_panic(expected = "turn queue exhausted")]
    async fn panics_when_the_queue_runs_dry() {
        let provider = MockLlmProvider::new(vec![]);
        let _ = provider
            .step(
                StepRequest {
                    system_prompt: "",
                    toolset_schema: &[],
                    history: &[],
                    thinking_effort: loom_llm::ThinkingEffort::Off,
                },
                Arc::new(|_| {}),
                Arc::new(|_| {}),
            )
            .await;
    }
}
