//! Replace the oldest portion of history with a single LLM-written summary.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loom_core::{Message, Part};
use loom_llm::{StepRequest, ThinkingEffort};

use crate::strategy::{CompactionContext, CompactionStrategy};

const SUMMARY_PROMPT: &str = "Summarize the conversation so far in a few dense paragraphs. \
Preserve concrete facts, file paths, decisions made, and open threads. Do not address the user.";

/// Summarizes every message but the last `preserve_last_n_messages` into a
/// single system message, via a fresh, toolless `ChatProvider::step` call.
pub struct LlmSummaryStrategy {
    preserve_last_n_messages: usize,
}

impl LlmSummaryStrategy {
    /// Keep the `n` most recent messages verbatim; summarize everything before them.
    #[must_use]
    pub fn new(preserve_last_n_messages: usize) -> Self {
        Self {
            preserve_last_n_messages,
        }
    }
}

impl Default for LlmSummaryStrategy {
    fn default() -> Self {
        Self::new(2)
    }
}

#[async_trait]
impl CompactionStrategy for LlmSummaryStrategy {
    async fn compact(&self, ctx: CompactionContext<'_>) -> Option<Vec<Message>> {
        if ctx.history.len() <= self.preserve_last_n_messages {
            return None;
        }
        let split = ctx.history.len() - self.preserve_last_n_messages;
        let (to_summarize, preserved) = ctx.history.split_at(split);
        if to_summarize.is_empty() {
            return None;
        }

        let mut request_history = to_summarize.to_vec();
        request_history.push(Message::user(SUMMARY_PROMPT));

        let buffer: Arc<Mutex<String>> = Arc::new(Mutex::new(String::new()));
        let sink_buffer = Arc::clone(&buffer);
        let on_message_part: loom_llm::MessagePartSink = Arc::new(move |part| {
            if let Part::Text { text } = part {
                sink_buffer.lock().expect("summary buffer poisoned").push_str(&text);
            }
        });
        let on_tool_result: loom_llm::ToolResultSink = Arc::new(|_message| {});

        let request = StepRequest {
            system_prompt: "You compress conversation history. You have no tools.",
            toolset_schema: &[],
            history: &request_history,
            thinking_effort: ThinkingEffort::Off,
        };

        let result = ctx.llm.step(request, on_message_part, on_tool_result).await.ok()?;
        // A toolless request should never yield tool calls, but honor the
        // contract and wait for the (empty) result set anyway.
        let _ = result.tool_results().await;

        let summary_text = buffer.lock().expect("summary buffer poisoned").clone();
        if summary_text.trim().is_empty() {
            return None;
        }

        let mut new_history = Vec::with_capacity(preserved.len() + 1);
        new_history.push(Message::system(format!("Earlier conversation summary:\n\n{summary_text}")));
        new_history.extend(preserved.iter().cloned());
        Some(new_history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_llm::{ChatProvider, LlmResult, ProviderCapabilities, StepResult, Usage};

    struct StubProvider {
        reply: &'static str,
    }

    #[async_trait]
    impl ChatProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }
        fn model(&self) -> &str {
            "stub-model"
        }
        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities::default()
        }
        async fn step(
            &self,
            _request: StepRequest<'_>,
            on_message_part: loom_llm::MessagePartSink,
            on_tool_result: loom_llm::ToolResultSink,
        ) -> LlmResult<StepResult> {
            on_message_part(Part::text(self.reply));
            Ok(StepResult::new(
                "summary-msg".to_string(),
                Usage::default(),
                vec![],
                on_tool_result,
            ))
        }
    }

    fn history_of(n: usize) -> Vec<Message> {
        (0..n).map(|i| Message::user(format!("message {i}"))).collect()
    }

    #[tokio::test]
    async fn no_op_when_history_fits_within_preserved_window() {
        let history = history_of(2);
        let provider = StubProvider { reply: "summary" };
        let ctx = CompactionContext {
            history: &history,
            token_count: 10,
            max_context_size: 1000,
            reserved_context_size: 100,
            llm: &provider,
        };
        let strategy = LlmSummaryStrategy::new(2);
        assert!(strategy.compact(ctx).await.is_none());
    }

    #[tokio::test]
    async fn summarizes_everything_but_the_preserved_tail() {
        let history = history_of(6);
        let provider = StubProvider {
            reply: "the user asked six questions",
        };
        let ctx = CompactionContext {
            history: &history,
            token_count: 10,
            max_context_size: 1000,
            reserved_context_size: 100,
            llm: &provider,
        };
        let strategy = LlmSummaryStrategy::new(2);
        let compacted = strategy.compact(ctx).await.expect("should summarize");

        assert_eq!(compacted.len(), 3);
        assert_eq!(compacted[0].role, loom_core::Role::System);
        assert!(compacted[0].text().contains("the user asked six questions"));
        assert_eq!(compacted[1].text(), "message 4");
        assert_eq!(compacted[2].text(), "message 5");
    }
}
