//! The built-in tool trait and name-keyed registry (spec §4.4).

use std::collections::HashMap;

use async_trait::async_trait;
use loom_llm::ToolSchema;
use serde_json::Value;

use crate::context::ToolContext;
use crate::error::ToolResult;

/// A tool that executes directly in-process (as opposed to an MCP server,
/// which is out of scope for this crate).
#[async_trait]
pub trait BuiltinTool: Send + Sync {
    /// Stable tool name (no colon — `server:tool` names are reserved for
    /// MCP-backed tools materialized elsewhere).
    fn name(&self) -> &'static str;

    /// Description shown to the model.
    fn description(&self) -> &'static str;

    /// JSON Schema for this tool's arguments.
    fn input_schema(&self) -> Value;

    /// Run the tool body.
    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult;
}

/// Name-keyed registry of built-in tools, materialized at agent-spec load
/// time (the loader itself is out of scope for this crate).
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Box<dyn BuiltinTool>>,
}

impl ToolRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any previous tool of the same name.
    pub fn register(&mut self, tool: Box<dyn BuiltinTool>) {
        self.tools.insert(tool.name(), tool);
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn BuiltinTool> {
        self.tools.get(name).map(AsRef::as_ref)
    }

    /// A name is a built-in (not MCP-backed) tool if it carries no colon.
    #[must_use]
    pub fn is_builtin(name: &str) -> bool {
        !name.contains(':')
    }

    /// Export every registered tool's schema for the LLM's toolset.
    #[must_use]
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .values()
            .map(|t| ToolSchema {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.input_schema(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_builtin_distinguishes_mcp_names() {
        assert!(ToolRegistry::is_builtin("send_dmail"));
        assert!(!ToolRegistry::is_builtin("filesystem:read_file"));
    }
}
