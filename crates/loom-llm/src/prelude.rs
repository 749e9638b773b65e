//! Commonly used types for convenient import.

pub use crate::error::{LlmError, LlmResult};
pub use crate::provider::{ChatProvider, MessagePartSink, StepRequest, StepResult, ToolResultSink, ToolResults};
pub use crate::types::{ProviderCapabilities, ThinkingEffort, ToolCallRequest, ToolSchema, Usage};
