//! Loom LLM — the chat-provider contract the agent loop consumes (spec §6).
//!
//! This crate defines only the contract. Vendor wire protocols (Anthropic,
//! OpenAI, etc.) are out of scope; `loom-test` supplies a scripted provider
//! for the rest of the workspace's tests.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod error;
pub mod prelude;
mod provider;
mod types;

pub use error::{LlmError, LlmResult};
pub use provider::{ChatProvider, MessagePartSink, StepRequest, StepResult, ToolResultSink, ToolResults};
pub use types::{ProviderCapabilities, ThinkingEffort, ToolCallRequest, ToolSchema, Usage};
