//! Replace older tool results with a placeholder, keeping the assistant's
//! tool-call parts (and thus the call/result pairing invariant) intact.

use async_trait::async_trait;
use loom_core::{Message, Part};

use crate::grouping::find_groups;
use crate::strategy::{CompactionContext, CompactionStrategy};

const HIDDEN_PLACEHOLDER: &str = "[tool result hidden to save context]";

/// Hides the tool results of every tool-call group except the most recent
/// `preserve_last_n_groups`. A no-op if there are too few groups to hide any.
pub struct ToolResultHidingStrategy {
    preserve_last_n_groups: usize,
}

impl ToolResultHidingStrategy {
    /// Preserve the `n` most recent tool-call groups untouched.
    #[must_use]
    pub fn new(preserve_last_n_groups: usize) -> Self {
        Self { preserve_last_n_groups }
    }
}

impl Default for ToolResultHidingStrategy {
    fn default() -> Self {
        Self::new(5)
    }
}

#[async_trait]
impl CompactionStrategy for ToolResultHidingStrategy {
    async fn compact(&self, ctx: CompactionContext<'_>) -> Option<Vec<Message>> {
        let groups = find_groups(ctx.history);
        if groups.len() <= self.preserve_last_n_groups {
            return None;
        }
        let hide_count = groups.len() - self.preserve_last_n_groups;
        let mut hidden_indices = std::collections::HashSet::new();
        for group in &groups[..hide_count] {
            for &idx in &group.tool_indices {
                hidden_indices.insert(idx);
            }
        }
        if hidden_indices.is_empty() {
            return None;
        }

        let mut changed = false;
        let new_history = ctx
            .history
            .iter()
            .enumerate()
            .map(|(idx, message)| {
                if !hidden_indices.contains(&idx) {
                    return message.clone();
                }
                let parts = message
                    .parts
                    .iter()
                    .map(|part| match part {
                        Part::ToolResult {
                            tool_call_id,
                            is_error,
                            ..
                        } => {
                            changed = true;
                            Part::ToolResult {
                                tool_call_id: tool_call_id.clone(),
                                content: HIDDEN_PLACEHOLDER.to_string(),
                                is_error: *is_error,
                            }
                        }
                        other => other.clone(),
                    })
                    .collect();
                Message {
                    role: message.role,
                    parts,
                }
            })
            .collect();

        changed.then_some(new_history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_llm::ChatProvider;

    struct UnusedProvider;

    #[async_trait]
    impl ChatProvider for UnusedProvider {
        fn name(&self) -> &str {
            "unused"
        }
        fn model(&self) -> &str {
            "unused"
        }
        fn capabilities(&self) -> loom_llm::ProviderCapabilities {
            loom_llm::ProviderCapabilities::default()
        }
        async fn step(
            &self,
            _request: loom_llm::StepRequest<'_>,
            _on_message_part: loom_llm::MessagePartSink,
            _on_tool_result: loom_llm::ToolResultSink,
        ) -> loom_llm::LlmResult<loom_llm::StepResult> {
            unreachable!("hiding strategy never calls the provider")
        }
    }

    fn group(call_id: &str) -> Vec<Message> {
        vec![
            Message::assistant_with_tool_calls(
                None,
                vec![Part::ToolCall {
                    id: call_id.into(),
                    name: "shell".into(),
                    arguments: serde_json::json!({}),
                }],
            ),
            Message::tool_result(call_id, "some output", false),
        ]
    }

    #[tokio::test]
    async fn no_op_when_fewer_groups_than_preserved() {
        let mut history = vec![Message::user("hi")];
        history.extend(group("call_1"));
        let provider = UnusedProvider;
        let ctx = CompactionContext {
            history: &history,
            token_count: 100,
            max_context_size: 1000,
            reserved_context_size: 100,
            llm: &provider,
        };
        let strategy = ToolResultHidingStrategy::new(5);
        assert!(strategy.compact(ctx).await.is_none());
    }

    #[tokio::test]
    async fn hides_older_groups_preserving_call_ids() {
        let mut history = vec![Message::user("hi")];
        for i in 0..7 {
            history.extend(group(&format!("call_{i}")));
        }
        let provider = UnusedProvider;
        let ctx = CompactionContext {
            history: &history,
            token_count: 100,
            max_context_size: 1000,
            reserved_context_size: 100,
            llm: &provider,
        };
        let strategy = ToolResultHidingStrategy::new(2);
        let compacted = strategy.compact(ctx).await.expect("should hide");

        let groups = find_groups(&compacted);
        assert_eq!(groups.len(), 7, "tool-call pairing invariant preserved");

        for group in &groups[..5] {
            for &idx in &group.tool_indices {
                assert!(matches!(
                    &compacted[idx].parts[0],
                    Part::ToolResult { content, .. } if content == HIDDEN_PLACEHOLDER
                ));
            }
        }
        for group in &groups[5..] {
            for &idx in &group.tool_indices {
                assert!(matches!(
                    &compacted[idx].parts[0],
                    Part::ToolResult { content, .. } if content == "some output"
                ));
            }
        }
    }
}
