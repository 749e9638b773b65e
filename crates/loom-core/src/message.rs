//! The `Message`/`Role`/`Part` data model (spec §3).
//!
//! A [`Message`] is the atomic unit of [`Context`](../loom_context/index.html)
//! history. Its content is an ordered sequence of [`Part`]s; which variants
//! are legal depends on the message's [`Role`] (enforced by construction
//! helpers, not by the type system, matching `astrid_llm::MessageContent`'s
//! looser `#[serde(untagged)]` shape).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The role of a [`Message`] within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A system-authored message (system prompt, compaction summary, D-Mail note).
    System,
    /// A user-authored message.
    User,
    /// An assistant (LLM) message — may carry tool calls.
    Assistant,
    /// A tool result message, bound to an assistant tool call by `tool_call_id`.
    Tool,
}

/// One part of a message's content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Plain text (assistant prose, user input, system notes).
    Text {
        /// The text content.
        text: String,
    },
    /// A reasoning/thinking delta, distinct from user-visible text.
    Thinking {
        /// The thinking content.
        text: String,
    },
    /// A reference to an image supplied as input.
    Image {
        /// Base64-encoded image bytes.
        data: String,
        /// MIME type, e.g. `image/png`.
        media_type: String,
    },
    /// A tool call issued by the assistant. Only legal on `Role::Assistant`
    /// messages.
    ToolCall {
        /// Provider-assigned call id, used to pair with the tool result.
        id: String,
        /// Tool name (may be `server:tool` for MCP-style tools).
        name: String,
        /// Parsed arguments.
        arguments: Value,
    },
    /// A tool result. Only legal on `Role::Tool` messages.
    ToolResult {
        /// The call id this result answers.
        tool_call_id: String,
        /// The tool's output (or error description).
        content: String,
        /// Whether `content` describes a failure.
        is_error: bool,
    },
}

impl Part {
    /// Build a plain text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The tool call id carried by a [`Part::ToolCall`] or [`Part::ToolResult`].
    #[must_use]
    pub fn tool_call_id(&self) -> Option<&str> {
        match self {
            Self::ToolCall { id, .. } => Some(id),
            Self::ToolResult { tool_call_id, .. } => Some(tool_call_id),
            _ => None,
        }
    }
}

/// The atomic unit of conversation history (spec §3).
///
/// Invariant enforced by `loom-context`, not by this type: every assistant
/// message's tool calls are followed by exactly one tool message per call
/// before the next assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The message's role.
    pub role: Role,
    /// Ordered content parts.
    pub parts: Vec<Part>,
}

impl Message {
    /// Construct a user message with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    /// Construct a system message with a single text part.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            parts: vec![Part::text(text)],
        }
    }

    /// Construct a plain-text assistant message (no tool calls).
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            parts: vec![Part::text(text)],
        }
    }

    /// Construct an assistant message carrying tool calls (and optionally
    /// preceding prose, if `text` is non-empty).
    #[must_use]
    pub fn assistant_with_tool_calls(text: Option<String>, tool_calls: Vec<Part>) -> Self {
        let mut parts = Vec::with_capacity(tool_calls.len() + 1);
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            parts.push(Part::text(text));
        }
        parts.extend(tool_calls);
        Self {
            role: Role::Assistant,
            parts,
        }
    }

    /// Construct a tool result message.
    #[must_use]
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>, is_error: bool) -> Self {
        Self {
            role: Role::Tool,
            parts: vec![Part::ToolResult {
                tool_call_id: tool_call_id.into(),
                content: content.into(),
                is_error,
            }],
        }
    }

    /// The tool calls carried by this message, if any.
    #[must_use]
    pub fn tool_calls(&self) -> Vec<&Part> {
        self.parts
            .iter()
            .filter(|p| matches!(p, Part::ToolCall { .. }))
            .collect()
    }

    /// `true` if this is an assistant message with at least one tool call.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        self.role == Role::Assistant && self.parts.iter().any(|p| matches!(p, Part::ToolCall { .. }))
    }

    /// Concatenated text content (ignores tool calls/results/thinking).
    #[must_use]
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// The user's decision on an [`ApprovalRequest`](crate::ids::RequestId)-backed
/// consent prompt (spec §3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Approve this single invocation only.
    ApproveOnce,
    /// Approve this invocation and whitelist the action for the session.
    ApproveForSession,
    /// Reject the invocation.
    Reject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_with_tool_calls_orders_text_before_calls() {
        let call = Part::ToolCall {
            id: "call_1".into(),
            name: "shell".into(),
            arguments: serde_json::json!({"command": "echo hi"}),
        };
        let msg = Message::assistant_with_tool_calls(Some("let me check".into()), vec![call]);
        assert!(matches!(msg.parts[0], Part::Text { .. }));
        assert!(matches!(msg.parts[1], Part::ToolCall { .. }));
        assert!(msg.has_tool_calls());
    }

    #[test]
    fn tool_result_round_trips_through_json() {
        let msg = Message::tool_result("call_1", "hi", false);
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.role, Role::Tool);
        assert_eq!(back.parts[0].tool_call_id(), Some("call_1"));
    }

    #[test]
    fn text_ignores_non_text_parts() {
        let msg = Message::assistant_with_tool_calls(
            Some("hello".into()),
            vec![Part::ToolCall {
                id: "1".into(),
                name: "x".into(),
                arguments: Value::Null,
            }],
        );
        assert_eq!(msg.text(), "hello");
    }
}
