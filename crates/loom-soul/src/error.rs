//! The error taxonomy (spec §7) as a single aggregated enum.
//!
//! `ToolRejectedError` and `ToolExecutionError` are not represented here:
//! per the taxonomy table, both are recorded as ordinary tool-result
//! messages and handled inline by [`crate::soul::Soul::step`] rather than
//! surfaced as a failure. `BackToTheFuture` is likewise not an error — it
//! is [`crate::outcome::StepOutcome::BackToTheFuture`], a tagged result
//! variant per the Design Note in spec §9, not a thrown exception.

use loom_context::ContextError;
use loom_llm::LlmError;
use thiserror::Error;

/// Failures that can end a turn.
#[derive(Debug, Error)]
pub enum SoulError {
    /// The user's input needs a capability (e.g. `image_in`) the
    /// configured model does not advertise.
    #[error("model {model} does not support {capability}")]
    LlmNotSupported {
        /// The model in use.
        model: String,
        /// The missing capability.
        capability: &'static str,
    },

    /// The chat provider failed fatally, or exhausted its retry budget on a
    /// transient error.
    #[error(transparent)]
    ChatProvider(#[from] LlmError),

    /// `step_no` exceeded `max_steps_per_run`.
    #[error("step {step_no} exceeds the configured max_steps_per_run ({max})")]
    MaxStepsReached {
        /// The step number that tripped the limit.
        step_no: u32,
        /// The configured ceiling.
        max: u32,
    },

    /// The turn was cancelled (e.g. user `Ctrl-C`) while awaiting the LLM.
    #[error("turn cancelled")]
    RunCancelled,

    /// The context journal failed to read, write, or resolve a checkpoint.
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Convenience alias for agent-loop results.
pub type SoulResult<T> = Result<T, SoulError>;
