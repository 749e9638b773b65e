//! Supporting types for the chat-provider contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How much reasoning effort to request from the model, if it supports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingEffort {
    /// No extended reasoning.
    Off,
    /// Light reasoning budget.
    Low,
    /// Default reasoning budget.
    Medium,
    /// Maximum reasoning budget.
    High,
}

impl Default for ThinkingEffort {
    fn default() -> Self {
        Self::Off
    }
}

/// A tool's schema as presented to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name, as the model will reference it in a tool call.
    pub name: String,
    /// Human-readable description shown to the model.
    pub description: String,
    /// JSON Schema for the tool's arguments.
    pub parameters: Value,
}

/// A tool call requested by the assistant during a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Parsed arguments.
    pub arguments: Value,
}

/// Reported token usage for a completed step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens consumed.
    pub prompt_tokens: u64,
    /// Tokens generated.
    pub completion_tokens: u64,
}

impl Usage {
    /// Total tokens across prompt and completion.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// Capabilities a model may or may not have.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// Whether the model accepts image parts in the input.
    pub image_in: bool,
}
