//! `task` — spawns a nested agent loop via the labor market (spec §4.7).

use async_trait::async_trait;
use serde_json::Value;

use crate::context::{SubagentRequest, ToolContext};
use crate::error::{ToolError, ToolOutput, ToolResult};
use crate::registry::BuiltinTool;

/// Hands a self-contained task off to a subagent and returns its final
/// answer. The subagent has its own context but shares the wire (its events
/// arrive wrapped in `SubagentEvent`) and the runtime.
pub struct TaskTool;

#[async_trait]
impl BuiltinTool for TaskTool {
    fn name(&self) -> &'static str {
        "task"
    }

    fn description(&self) -> &'static str {
        "Delegate a self-contained task to a subagent and return its final answer."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "required": ["description", "prompt"],
            "properties": {
                "description": {"type": "string", "description": "short label shown in logs"},
                "prompt": {"type": "string", "description": "full instructions for the subagent"},
            },
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let description = args
            .get("description")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::Rejected("description must be a string".into()))?
            .to_string();
        let prompt = args
            .get("prompt")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::Rejected("prompt must be a string".into()))?
            .to_string();

        let Some(spawner) = ctx.subagent_spawner().await else {
            return Err(ToolError::ExecutionFailed("no subagent spawner is configured".into()));
        };

        let result = spawner
            .spawn(SubagentRequest {
                label: description,
                prompt,
                timeout: None,
            })
            .await
            .map_err(ToolError::ExecutionFailed)?;

        Ok(ToolOutput::text(result.output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{SubagentResult, SubagentSpawner};
    use async_trait::async_trait as async_trait_attr;
    use loom_approval::ApprovalMediator;
    use loom_wire::Wire;
    use std::sync::Arc;

    struct StubSpawner;

    #[async_trait_attr]
    impl SubagentSpawner for StubSpawner {
        async fn spawn(&self, request: SubagentRequest) -> Result<SubagentResult, String> {
            Ok(SubagentResult {
                output: format!("did: {}", request.prompt),
                tool_calls: 0,
            })
        }
    }

    #[tokio::test]
    async fn delegates_to_the_configured_spawner() {
        let ctx = ToolContext::new(std::env::temp_dir(), ApprovalMediator::new(Wire::new(), true));
        ctx.set_subagent_spawner(Some(Arc::new(StubSpawner))).await;

        let tool = TaskTool;
        let args = serde_json::json!({"description": "investigate", "prompt": "find the bug"});
        let output = tool.execute(args, &ctx).await.unwrap();
        assert_eq!(output.return_value, "did: find the bug");
    }

    #[tokio::test]
    async fn fails_without_a_spawner() {
        let ctx = ToolContext::new(std::env::temp_dir(), ApprovalMediator::new(Wire::new(), true));
        let tool = TaskTool;
        let args = serde_json::json!({"description": "investigate", "prompt": "find the bug"});
        let err = tool.execute(args, &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }
}
