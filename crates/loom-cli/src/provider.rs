//! A [`ChatProvider`] placeholder standing in for a real vendor adapter.
//!
//! Vendor wire protocols are out of scope for this workspace; wiring one in
//! is left to an external integrator. This stub makes the binary a complete,
//! runnable skeleton in the meantime, failing every step with a fatal error
//! that names what's missing rather than silently doing nothing.

use async_trait::async_trait;
use loom_llm::{ChatProvider, LlmError, LlmResult, MessagePartSink, ProviderCapabilities, StepRequest, StepResult, ToolResultSink};

/// Reports no capabilities and fails every [`ChatProvider::step`] call.
pub struct UnconfiguredProvider;

#[async_trait]
impl ChatProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn model(&self) -> &str {
        "none"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }

    async fn step(
        &self,
        _request: StepRequest<'_>,
        _on_message_part: MessagePartSink,
        _on_tool_result: ToolResultSink,
    ) -> LlmResult<StepResult> {
        Err(LlmError::Fatal(
            "no chat provider configured; wire in a vendor adapter before running a turn".to_string(),
        ))
    }
}
