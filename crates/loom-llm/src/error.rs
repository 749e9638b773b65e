//! LLM-related error types (spec §7: `ChatProviderTransient`/`ChatProviderFatal`).

use thiserror::Error;

/// Errors raised by a [`crate::ChatProvider`].
#[derive(Debug, Error)]
pub enum LlmError {
    /// `429`, `500`-`503`, a connection/timeout failure, or an empty
    /// response. Retried within the step by the agent loop's backoff policy.
    #[error("transient provider error: {0}")]
    Transient(String),

    /// Any `4xx` other than `429`, or a response the provider cannot
    /// recover from. Surfaced to the user; ends the turn.
    #[error("fatal provider error: {0}")]
    Fatal(String),

    /// The model lacks a capability the request needs (e.g. `image_in`).
    #[error("model {model} does not support {capability}")]
    Unsupported {
        /// The model name.
        model: String,
        /// The missing capability.
        capability: &'static str,
    },
}

impl LlmError {
    /// `true` for errors the agent loop should retry within the current step.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Convenience alias for chat-provider results.
pub type LlmResult<T> = Result<T, LlmError>;
