//! The `compact` contract (spec §4.5).

use async_trait::async_trait;
use loom_core::Message;
use loom_llm::ChatProvider;

/// The inputs one [`CompactionStrategy::compact`] call needs.
pub struct CompactionContext<'a> {
    /// The full history to consider compacting.
    pub history: &'a [Message],
    /// Last reported prompt-token usage.
    pub token_count: u64,
    /// The model's context window.
    pub max_context_size: u64,
    /// Tokens reserved for the step about to run.
    pub reserved_context_size: u64,
    /// The provider to call for summarization, if the strategy needs one.
    pub llm: &'a dyn ChatProvider,
}

/// A history-reduction strategy. Returning `None` means "no-op": the caller
/// keeps the existing history unchanged.
#[async_trait]
pub trait CompactionStrategy: Send + Sync {
    /// Attempt to reduce `ctx.history`. Must preserve the invariant that
    /// every assistant tool call still has a matching tool message.
    async fn compact(&self, ctx: CompactionContext<'_>) -> Option<Vec<Message>>;
}
