//! One-call construction of the `Context`/`Wire`/`ApprovalMediator` trio most
//! integration tests need.

use loom_approval::ApprovalMediator;
use loom_context::{Context, ContextResult};
use loom_wire::Wire;
use tempfile::TempDir;

/// A disposable, fully-wired test environment: a fresh journal-backed
/// [`Context`] in a temp directory, a [`Wire`], and an [`ApprovalMediator`]
/// (YOLO off by default).
///
/// The `TempDir` is kept alive on the struct so the journal file isn't
/// cleaned up out from under an in-progress test.
pub struct TestHarness {
    /// Keeps the backing temp directory alive for the harness's lifetime.
    pub _dir: TempDir,
    /// A fresh context backed by `_dir/context.jsonl`.
    pub context: Context,
    /// The wire both the context's consumers and the approval mediator share.
    pub wire: Wire,
    /// An approval mediator with YOLO off and the default timeout.
    pub approval: ApprovalMediator,
}

/// Build a [`TestHarness`] with a fresh context, wire, and approval mediator.
///
/// # Errors
///
/// Returns an error if the journal file cannot be opened.
pub async fn test_harness() -> ContextResult<TestHarness> {
    let dir = TempDir::new().expect("failed to create temp directory");
    let context = Context::open(dir.path().join("context.jsonl")).await?;
    let wire = Wire::new();
    let approval = ApprovalMediator::new(wire.clone(), false);
    Ok(TestHarness {
        _dir: dir,
        context,
        wire,
        approval,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_an_empty_context_with_a_live_wire() {
        let harness = test_harness().await.unwrap();
        assert!(harness.context.messages().is_empty());
        assert_eq!(harness.wire.subscriber_count(), 0);
        assert!(!harness.approval.yolo());
    }
}
