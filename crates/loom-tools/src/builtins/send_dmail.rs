//! `send_dmail` — the tool that enqueues a checkpoint-rewind request
//! (spec §4.6: D-Mail).

use async_trait::async_trait;
use loom_core::CheckpointId;
use serde_json::Value;

use crate::context::ToolContext;
use crate::error::{ToolError, ToolOutput, ToolResult};
use crate::registry::BuiltinTool;

/// Enqueues a pending D-Mail: on the next step, the agent loop reverts the
/// context to `checkpoint_id` and injects `message` as a fresh system note.
///
/// At most one D-Mail may be pending per turn; a second call before the
/// first is consumed is rejected.
pub struct SendDMailTool;

#[async_trait]
impl BuiltinTool for SendDMailTool {
    fn name(&self) -> &'static str {
        "send_dmail"
    }

    fn description(&self) -> &'static str {
        "Rewind the conversation to an earlier checkpoint and inject a note, as if sending a \
         message back in time. Use this to abandon a failed approach and retry from a known-good \
         point."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "required": ["checkpoint_id", "message"],
            "properties": {
                "checkpoint_id": {"type": "integer", "minimum": 0},
                "message": {"type": "string"},
            },
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let checkpoint_id = args
            .get("checkpoint_id")
            .and_then(Value::as_u64)
            .ok_or_else(|| ToolError::Rejected("checkpoint_id must be a non-negative integer".into()))?
            as CheckpointId;
        let message = args
            .get("message")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::Rejected("message must be a string".into()))?
            .to_string();

        let mut slot = ctx.dmail.write().await;
        if slot.is_some() {
            return Err(ToolError::ExecutionFailed(
                "a D-Mail is already pending for this turn".into(),
            ));
        }
        *slot = Some((checkpoint_id, message));

        Ok(ToolOutput::text("D-Mail queued; it will be delivered at the start of the next step"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_approval::ApprovalMediator;
    use loom_wire::Wire;

    fn test_ctx() -> ToolContext {
        ToolContext::new(std::env::temp_dir(), ApprovalMediator::new(Wire::new(), true))
    }

    #[tokio::test]
    async fn queues_exactly_one_pending_dmail() {
        let ctx = test_ctx();
        let tool = SendDMailTool;
        let args = serde_json::json!({"checkpoint_id": 1, "message": "try approach B"});
        tool.execute(args.clone(), &ctx).await.unwrap();
        assert_eq!(ctx.dmail.read().await.as_ref().unwrap().1, "try approach B");

        let err = tool.execute(args, &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }
}
