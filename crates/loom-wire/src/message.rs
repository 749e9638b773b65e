//! The `WireMessage` tagged union (spec §3, §6).

use loom_core::{ApprovalDecision, CheckpointId, RequestId, SessionId, TurnId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything that crosses the wire: one-way events plus the sole request
/// type, `ApprovalRequest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WireMessage {
    /// A turn has begun for the given user input.
    TurnBegin {
        /// The session the turn belongs to.
        session_id: SessionId,
        /// The turn's id.
        turn_id: TurnId,
        /// The raw user input that started the turn.
        input: String,
    },
    /// A new step has begun within the current turn.
    StepBegin {
        /// 1-indexed step number within the turn.
        step_no: u32,
    },
    /// The current step was interrupted (cancellation or unrecoverable error).
    StepInterrupted {
        /// Human-readable reason.
        reason: String,
    },
    /// A streamed delta of assistant text.
    TextPart {
        /// The assistant message id this delta belongs to.
        message_id: String,
        /// The incremental text.
        delta: String,
    },
    /// A streamed delta of assistant reasoning/thinking.
    ThinkPart {
        /// The assistant message id this delta belongs to.
        message_id: String,
        /// The incremental thinking text.
        delta: String,
    },
    /// A tool call has been fully identified (name resolved); arguments may
    /// still be streaming via [`WireMessage::ToolCallPart`].
    ToolCall {
        /// The provider-assigned call id.
        tool_call_id: String,
        /// Tool name.
        function: String,
        /// Arguments known so far (may be partial/empty).
        arguments: Value,
    },
    /// A streamed delta of a tool call's arguments.
    ToolCallPart {
        /// The call id this delta belongs to.
        tool_call_id: String,
        /// The incremental raw argument text (to be concatenated and parsed).
        delta: String,
    },
    /// A tool call has finished executing.
    ToolResult {
        /// The call id this result answers.
        tool_call_id: String,
        /// The tool's return value (its output string).
        return_value: String,
        /// Auxiliary structured output, if any.
        output: Option<Value>,
        /// Whether this result represents a failure.
        is_error: bool,
    },
    /// Out-of-band progress/status information.
    StatusUpdate {
        /// Reported prompt-token usage for the step just completed.
        token_usage: u64,
        /// The assistant message id this usage corresponds to.
        message_id: String,
        /// Fraction of `max_context_size` currently in use, 0.0-1.0.
        context_usage: f32,
    },
    /// Compaction has started.
    CompactionBegin,
    /// Compaction has finished.
    CompactionEnd {
        /// History length before compaction.
        messages_before: usize,
        /// History length after compaction.
        messages_after: usize,
    },
    /// The turn has ended normally.
    TurnEnd,
    /// A nested subagent emitted an event; `inner` is itself a [`WireMessage`]
    /// and should be rendered indented/nested by the UI.
    SubagentEvent {
        /// The subagent's label (its spawn name).
        label: String,
        /// The wrapped event.
        inner: Box<WireMessage>,
    },
    /// A tool is requesting user consent for a sensitive action. This is the
    /// sole `Request`-flavored variant: the producer suspends until a
    /// correspondingly-`request_id`'d [`WireMessage::ApprovalResponse`]
    /// arrives.
    ApprovalRequest {
        /// Unique id for this request.
        request_id: RequestId,
        /// The tool call this request is bound to.
        tool_call_id: String,
        /// Human-readable identification of the requester.
        sender: String,
        /// The action being requested, e.g. `"shell:execute"`.
        action: String,
        /// Human-readable description of what is being requested.
        description: String,
        /// Optional rich display blocks (diffs, command previews, ...).
        display_blocks: Option<Vec<Value>>,
    },
    /// The UI's answer to an [`WireMessage::ApprovalRequest`].
    ApprovalResponse {
        /// The request this answers.
        request_id: RequestId,
        /// The user's decision.
        decision: ApprovalDecision,
    },
}

impl WireMessage {
    /// A short, stable discriminant string for logging and recording.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TurnBegin { .. } => "turn_begin",
            Self::StepBegin { .. } => "step_begin",
            Self::StepInterrupted { .. } => "step_interrupted",
            Self::TextPart { .. } => "text_part",
            Self::ThinkPart { .. } => "think_part",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolCallPart { .. } => "tool_call_part",
            Self::ToolResult { .. } => "tool_result",
            Self::StatusUpdate { .. } => "status_update",
            Self::CompactionBegin => "compaction_begin",
            Self::CompactionEnd { .. } => "compaction_end",
            Self::TurnEnd => "turn_end",
            Self::SubagentEvent { .. } => "subagent_event",
            Self::ApprovalRequest { .. } => "approval_request",
            Self::ApprovalResponse { .. } => "approval_response",
        }
    }
}
