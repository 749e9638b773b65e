//! The agent loop's numeric knobs (spec §4.6, §9 "ambient configuration").
//!
//! Full TOML/JSON loading is an external collaborator's job per spec §1;
//! this struct and its defaults are the part that belongs in the core so it
//! is usable standalone and in tests.

use serde::{Deserialize, Serialize};

/// Tunables for one agent loop run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentLoopConfig {
    /// Hard ceiling on steps within one turn before `MaxStepsReached`.
    pub max_steps_per_run: u32,
    /// Retry budget for transient chat-provider errors, per step.
    pub max_retries_per_step: u32,
    /// The model's context window, in tokens.
    pub max_context_size: u64,
    /// Tokens reserved for the step about to run; compaction triggers when
    /// `token_count + reserved_context_size >= max_context_size`.
    pub reserved_context_size: u64,
    /// Messages a compaction strategy should preserve at the tail.
    pub max_preserved_messages: usize,
}

impl Default for AgentLoopConfig {
    fn default() -> Self {
        Self {
            max_steps_per_run: 50,
            max_retries_per_step: 3,
            max_context_size: 100_000,
            reserved_context_size: 4_096,
            max_preserved_messages: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_spec_named_values() {
        let config = AgentLoopConfig::default();
        assert_eq!(config.max_retries_per_step, 3);
        assert_eq!(config.max_preserved_messages, 2);
    }

    #[test]
    fn round_trips_through_json_with_partial_overrides() {
        let json = serde_json::json!({"max_steps_per_run": 10});
        let config: AgentLoopConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.max_steps_per_run, 10);
        assert_eq!(config.max_retries_per_step, 3);
    }
}
