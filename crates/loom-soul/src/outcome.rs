//! `step()`'s result, modeled as a tagged variant per the Design Note in
//! spec §9 rather than the exception-driven control flow the algorithm
//! sketch uses (`BackToTheFuture` as a thrown error).

use loom_core::CheckpointId;

/// What the loop should do after one [`crate::soul::Soul::step`] call.
pub(crate) enum StepOutcome {
    /// The assistant answered without tool calls, or a tool call was
    /// rejected: the turn is over.
    Finished,
    /// Tool calls executed without incident; loop again.
    Continue,
    /// A D-Mail is pending: rewind to `checkpoint_id` and inject `message`
    /// as a fresh system note before the next step.
    BackToTheFuture {
        /// The checkpoint to revert to.
        checkpoint_id: CheckpointId,
        /// The note to inject after reverting.
        message: String,
    },
}
