//! A scripted stand-in for the UI half of the approval protocol.
//!
//! [`ApprovalMediator`] publishes [`WireMessage::ApprovalRequest`] and waits
//! for a matching [`WireMessage::ApprovalResponse`]. In production a UI
//! subscriber answers; in tests, [`MockApprovalHandler`] plays that role
//! with a scripted queue of decisions.

use std::collections::VecDeque;
use std::sync::Mutex;

use loom_core::ApprovalDecision;
use loom_wire::{Wire, WireMessage};
use tokio::task::JoinHandle;

/// Subscribes to the wire and answers every `ApprovalRequest` with the next
/// queued decision (or `default_decision` once the queue is empty).
pub struct MockApprovalHandler {
    task: JoinHandle<()>,
}

impl MockApprovalHandler {
    /// Spawn the handler. Runs until the wire is dropped.
    #[must_use]
    pub fn spawn(wire: Wire, decisions: Vec<ApprovalDecision>, default_decision: ApprovalDecision) -> Self {
        let queue = Mutex::new(VecDeque::from(decisions));
        let mut rx = wire.subscribe();
        let task = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if let WireMessage::ApprovalRequest { request_id, .. } = message.as_ref() {
                    let decision = queue
                        .lock()
                        .expect("lock poisoned")
                        .pop_front()
                        .unwrap_or(default_decision);
                    wire.send(WireMessage::ApprovalResponse {
                        request_id: *request_id,
                        decision,
                    });
                }
            }
        });
        Self { task }
    }
}

impl Drop for MockApprovalHandler {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_approval::ApprovalMediator;

    #[tokio::test]
    async fn answers_a_request_with_the_queued_decision() {
        let wire = Wire::new();
        let _handler =
            MockApprovalHandler::spawn(wire.clone(), vec![ApprovalDecision::ApproveOnce], ApprovalDecision::Reject);
        let mediator = ApprovalMediator::new(wire, false);

        let decision = mediator
            .request("call_1", "test", "shell:execute", "run echo hi", None)
            .await
            .unwrap();
        assert_eq!(decision, ApprovalDecision::ApproveOnce);
    }

    #[tokio::test]
    async fn falls_back_to_the_default_once_the_queue_is_empty() {
        let wire = Wire::new();
        let _handler = MockApprovalHandler::spawn(wire.clone(), vec![], ApprovalDecision::Reject);
        let mediator = ApprovalMediator::new(wire, false);

        let decision = mediator
            .request("call_1", "test", "shell:execute", "run echo hi", None)
            .await
            .unwrap();
        assert_eq!(decision, ApprovalDecision::Reject);
    }
}
