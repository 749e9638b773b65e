//! The per-call tool execution protocol (spec §4.4).
//!
//! All tool calls in one assistant message are dispatched concurrently;
//! results may complete in any order but are returned to the caller in the
//! LLM's declared order, ready for order-preserving history append.

use loom_core::Message;
use loom_llm::ToolCallRequest;
use loom_wire::{Wire, WireMessage};
use serde_json::Value;

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::registry::ToolRegistry;

/// The outcome of dispatching one tool call.
pub struct ToolCallOutcome {
    /// The tool result message, ready to append to context history.
    pub message: Message,
    /// `true` if this call was rejected (schema violation, unknown tool, or
    /// the approval mediator returned `Reject`) — a turn boundary in the
    /// agent loop, as opposed to an ordinary execution failure.
    pub rejected: bool,
}

/// Dispatch every call in `calls` concurrently, returning outcomes in the
/// same order `calls` was given.
pub async fn dispatch_all(
    registry: &ToolRegistry,
    wire: &Wire,
    ctx: &ToolContext,
    calls: &[ToolCallRequest],
) -> Vec<ToolCallOutcome> {
    let futures = calls.iter().map(|call| dispatch_one(registry, wire, ctx, call));
    futures::future::join_all(futures).await
}

/// Run the full per-call protocol for one tool call (spec §4.4 steps 2-7;
/// step 1, pushing onto an ambient "current tool call" stack, and step 3,
/// streaming argument deltas, are handled upstream by the agent loop while
/// it forwards the provider's stream onto the wire).
pub async fn dispatch_one(registry: &ToolRegistry, wire: &Wire, ctx: &ToolContext, call: &ToolCallRequest) -> ToolCallOutcome {
    wire.send(WireMessage::ToolCall {
        tool_call_id: call.id.clone(),
        function: call.name.clone(),
        arguments: call.arguments.clone(),
    });

    let call_ctx = ctx.for_call(call.id.clone());
    let outcome = match registry.get(&call.name) {
        None => Err(ToolError::Rejected(format!("unknown tool `{}`", call.name))),
        Some(tool) => match validate_arguments(&tool.input_schema(), &call.arguments) {
            Err(reason) => Err(ToolError::Rejected(reason)),
            Ok(()) => tool.execute(call.arguments.clone(), &call_ctx).await,
        },
    };

    let (return_value, output, is_error, rejected) = match &outcome {
        Ok(out) => (out.return_value.clone(), out.output.clone(), false, false),
        Err(ToolError::Rejected(reason)) => (reason.clone(), None, true, true),
        Err(ToolError::ExecutionFailed(reason)) => (reason.clone(), None, true, false),
    };

    wire.send(WireMessage::ToolResult {
        tool_call_id: call.id.clone(),
        return_value: return_value.clone(),
        output,
        is_error,
    });

    ToolCallOutcome {
        message: Message::tool_result(call.id.clone(), return_value, is_error),
        rejected,
    }
}

/// A lightweight shape check: if the schema declares `required` top-level
/// properties, confirm `arguments` is an object carrying each of them. This
/// is deliberately not a full JSON Schema validator — the model is trusted
/// for everything beyond presence of required fields.
fn validate_arguments(schema: &Value, arguments: &Value) -> Result<(), String> {
    let Some(required) = schema.get("required").and_then(Value::as_array) else {
        return Ok(());
    };
    let Some(obj) = arguments.as_object() else {
        return Err("arguments must be a JSON object".to_string());
    };
    for field in required {
        if let Some(name) = field.as_str() {
            if !obj.contains_key(name) {
                return Err(format!("missing required argument `{name}`"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ToolOutput, ToolResult};
    use async_trait::async_trait;
    use loom_approval::ApprovalMediator;

    struct EchoTool;

    #[async_trait]
    impl crate::registry::BuiltinTool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }
        fn description(&self) -> &'static str {
            "echoes its `text` argument"
        }
        fn input_schema(&self) -> Value {
            serde_json::json!({"type": "object", "required": ["text"]})
        }
        async fn execute(&self, args: Value, _ctx: &ToolContext) -> ToolResult {
            let text = args.get("text").and_then(Value::as_str).unwrap_or_default();
            Ok(ToolOutput::text(text.to_string()))
        }
    }

    fn test_ctx() -> ToolContext {
        let mediator = ApprovalMediator::new(Wire::new(), true);
        ToolContext::new(std::env::temp_dir(), mediator)
    }

    #[tokio::test]
    async fn successful_call_round_trips_return_value() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let wire = Wire::new();
        let ctx = test_ctx();

        let call = ToolCallRequest {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({"text": "hi"}),
        };
        let outcome = dispatch_one(&registry, &wire, &ctx, &call).await;
        assert!(!outcome.rejected);
        assert_eq!(outcome.message.text(), "hi");
    }

    #[tokio::test]
    async fn missing_required_argument_is_rejected_without_invoking_body() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let wire = Wire::new();
        let ctx = test_ctx();

        let call = ToolCallRequest {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({}),
        };
        let outcome = dispatch_one(&registry, &wire, &ctx, &call).await;
        assert!(outcome.rejected);
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let registry = ToolRegistry::new();
        let wire = Wire::new();
        let ctx = test_ctx();

        let call = ToolCallRequest {
            id: "call_1".into(),
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let outcome = dispatch_one(&registry, &wire, &ctx, &call).await;
        assert!(outcome.rejected);
    }

    #[tokio::test]
    async fn dispatch_all_preserves_declared_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let wire = Wire::new();
        let ctx = test_ctx();

        let calls = vec![
            ToolCallRequest {
                id: "call_1".into(),
                name: "echo".into(),
                arguments: serde_json::json!({"text": "one"}),
            },
            ToolCallRequest {
                id: "call_2".into(),
                name: "echo".into(),
                arguments: serde_json::json!({"text": "two"}),
            },
        ];
        let outcomes = dispatch_all(&registry, &wire, &ctx, &calls).await;
        assert_eq!(outcomes[0].message.text(), "one");
        assert_eq!(outcomes[1].message.text(), "two");
    }
}
