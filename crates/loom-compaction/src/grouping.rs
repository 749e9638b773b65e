//! Groups messages by assistant `tool_calls` boundary (spec §4.5).
//!
//! A group is an assistant message carrying one or more tool calls, plus the
//! tool messages that answer it. Messages outside any such boundary (plain
//! user/assistant/system turns) do not belong to a group.

use loom_core::Message;

/// One assistant-tool-calls boundary: the index of the assistant message and
/// the contiguous tool-message indices that follow it.
pub struct ToolCallGroup {
    /// Index of the assistant message in `history`.
    pub assistant_index: usize,
    /// Indices of the tool messages answering that assistant message.
    pub tool_indices: Vec<usize>,
}

/// Find every tool-call group in `history`, in order.
pub fn find_groups(history: &[Message]) -> Vec<ToolCallGroup> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < history.len() {
        if history[i].has_tool_calls() {
            let assistant_index = i;
            let mut tool_indices = Vec::new();
            let mut j = i + 1;
            while j < history.len() && history[j].role == loom_core::Role::Tool {
                tool_indices.push(j);
                j += 1;
            }
            groups.push(ToolCallGroup {
                assistant_index,
                tool_indices,
            });
            i = j;
        } else {
            i += 1;
        }
    }
    groups
}
