//! The labor market: a name-keyed registry of subagent templates (spec §4.7).

use std::collections::HashMap;

/// A subagent's full agent spec, as resolved by the (out-of-scope) spec
/// loader: a system prompt plus the subset of tool names it's allowed to use.
#[derive(Debug, Clone)]
pub struct SubagentTemplate {
    /// The name the `Task` tool's callers refer to this template by.
    pub name: String,
    /// The fresh system prompt a spawned child loop starts with.
    pub system_prompt: String,
    /// Tool names available to the child loop, a subset of the parent's
    /// toolset.
    pub allowed_tools: Vec<String>,
}

/// Registry of [`SubagentTemplate`]s available to the `Task` tool.
///
/// Construction (loading templates from an agent spec) is an external
/// collaborator's job per the spec's Non-goals; this crate only owns the
/// lookup table.
#[derive(Debug, Default)]
pub struct LaborMarket {
    templates: HashMap<String, SubagentTemplate>,
}

impl LaborMarket {
    /// An empty labor market.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any prior template of the same name.
    pub fn register(&mut self, template: SubagentTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Look up a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SubagentTemplate> {
        self.templates.get(name)
    }

    /// Names of every registered template.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_then_get_round_trips() {
        let mut market = LaborMarket::new();
        market.register(SubagentTemplate {
            name: "reviewer".to_string(),
            system_prompt: "You review code.".to_string(),
            allowed_tools: vec!["read_file".to_string()],
        });
        let found = market.get("reviewer").expect("template should be registered");
        assert_eq!(found.system_prompt, "You review code.");
    }

    #[test]
    fn unknown_name_returns_none() {
        let market = LaborMarket::new();
        assert!(market.get("missing").is_none());
    }
}
