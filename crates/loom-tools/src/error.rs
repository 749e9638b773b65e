//! Errors raised by tool execution (spec §4.4, §7).

use thiserror::Error;

/// Errors a [`crate::BuiltinTool`] may return from `execute`.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The user rejected the approval request, or the call's arguments
    /// failed schema validation before the tool body ran. Ends the current
    /// step and turn; never retried.
    #[error("tool call rejected: {0}")]
    Rejected(String),

    /// The tool raised or returned an error during execution. Recorded as a
    /// failing tool result; the loop continues and lets the LLM decide
    /// whether to retry.
    #[error("tool execution failed: {0}")]
    ExecutionFailed(String),
}

/// Convenience alias for tool results.
pub type ToolResult = Result<ToolOutput, ToolError>;

/// A successful tool invocation's output.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// The tool's primary textual result, shown to the model.
    pub return_value: String,
    /// Auxiliary structured output, if any, forwarded to the UI.
    pub output: Option<serde_json::Value>,
}

impl ToolOutput {
    /// Build a plain-text output with no auxiliary structured data.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            return_value: value.into(),
            output: None,
        }
    }
}
