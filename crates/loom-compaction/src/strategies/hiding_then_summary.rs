//! The recommended default: hide first, only summarize once hiding can't
//! free any more room.

use async_trait::async_trait;
use loom_core::Message;

use crate::strategies::llm_summary::LlmSummaryStrategy;
use crate::strategies::tool_result_hiding::ToolResultHidingStrategy;
use crate::strategy::{CompactionContext, CompactionStrategy};

/// Tries [`ToolResultHidingStrategy`] first; falls through to
/// [`LlmSummaryStrategy`] only when hiding was a no-op.
pub struct HidingThenSummaryStrategy {
    hiding: ToolResultHidingStrategy,
    summary: LlmSummaryStrategy,
}

impl HidingThenSummaryStrategy {
    /// Build the composite from its two component strategies.
    #[must_use]
    pub fn new(hiding: ToolResultHidingStrategy, summary: LlmSummaryStrategy) -> Self {
        Self { hiding, summary }
    }
}

impl Default for HidingThenSummaryStrategy {
    fn default() -> Self {
        Self::new(ToolResultHidingStrategy::default(), LlmSummaryStrategy::default())
    }
}

#[async_trait]
impl CompactionStrategy for HidingThenSummaryStrategy {
    async fn compact(&self, ctx: CompactionContext<'_>) -> Option<Vec<Message>> {
        let CompactionContext {
            history,
            token_count,
            max_context_size,
            reserved_context_size,
            llm,
        } = ctx;

        if let Some(hidden) = self
            .hiding
            .compact(CompactionContext {
                history,
                token_count,
                max_context_size,
                reserved_context_size,
                llm,
            })
            .await
        {
            tracing::debug!("compaction: hid older tool results");
            return Some(hidden);
        }

        let summarized = self
            .summary
            .compact(CompactionContext {
                history,
                token_count,
                max_context_size,
                reserved_context_size,
                llm,
            })
            .await;
        if summarized.is_some() {
            tracing::debug!("compaction: summarized older history");
        }
        summarized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_core::Part;
    use loom_llm::{ChatProvider, LlmResult, ProviderCapabilities, StepRequest, StepResult, Usage};

    struct StubProvider;

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
            on_message_part(Part::text("summary"));
            Ok(StepResult::new("m1".to_string(), Usage::default(), vec![], on_tool_result))
        }
    }

    fn tool_group(call_id: &str) -> Vec<Message> {
        vec![
            Message::assistant_with_tool_calls(
                None,
                vec![Part::ToolCall {
                    id: call_id.into(),
                    name: "shell".into(),
                    arguments: serde_json::json!({}),
                }],
            ),
            Message::tool_result(call_id, "output", false),
        ]
    }

    #[tokio::test]
    async fn prefers_hiding_when_it_applies() {
        let mut history = vec![Message::user("hi")];
        for i in 0..7 {
            history.extend(tool_group(&format!("call_{i}")));
        }
        let provider = StubProvider;
        let strategy = HidingThenSummaryStrategy::new(ToolResultHidingStrategy::new(2), LlmSummaryStrategy::new(2));
        let ctx = CompactionContext {
            history: &history,
            token_count: 100,
            max_context_size: 1000,
            reserved_context_size: 100,
            llm: &provider,
        };
        let compacted = strategy.compact(ctx).await.expect("should hide");
        assert!(compacted.iter().any(|m| m.text().contains("hi")));
        assert!(!compacted.iter().any(|m| m.role == loom_core::Role::System));
    }

    #[tokio::test]
    async fn falls_through_to_summary_once_hiding_is_a_no_op() {
        let history: Vec<Message> = (0..6).map(|i| Message::user(format!("message {i}"))).collect();
        let provider = StubProvider;
        let strategy = HidingThenSummaryStrategy::new(ToolResultHidingStrategy::new(5), LlmSummaryStrategy::new(2));
        let ctx = CompactionContext {
            history: &history,
            token_count: 100,
            max_context_size: 1000,
            reserved_context_size: 100,
            llm: &provider,
        };
        let compacted = strategy.compact(ctx).await.expect("should summarize");
        assert_eq!(compacted[0].role, loom_core::Role::System);
    }
}
