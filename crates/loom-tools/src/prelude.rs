//! Commonly used types for convenient import.

pub use crate::builtins::{SendDMailTool, TaskTool};
pub use crate::context::{DMailSlot, SubagentRequest, SubagentResult, SubagentSpawner, ToolContext};
pub use crate::error::{ToolError, ToolOutput, ToolResult};
pub use crate::protocol::{ToolCallOutcome, dispatch_all, dispatch_one};
pub use crate::registry::{BuiltinTool, ToolRegistry};
