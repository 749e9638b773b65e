//! The approval mediator (spec §4.3, component C3).
//!
//! Trimmed from `astrid-approval::manager::ApprovalManager`: no allowance
//! patterns, no deferred-resolution queue, no capability tokens. Only what
//! the spec asks for — per-tool-call approval requests over the wire, a
//! session whitelist keyed by action string, and a YOLO bypass.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use loom_core::{ApprovalDecision, RequestId};
use loom_wire::{Wire, WireMessage};
use serde_json::Value;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::{ApprovalError, ApprovalResult};

/// Default time to wait for a UI response before treating the request as
/// unanswered.
pub const DEFAULT_APPROVAL_TIMEOUT: Duration = Duration::from_secs(5 * 60);

type PendingTable = DashMap<RequestId, oneshot::Sender<ApprovalDecision>>;

/// Mediates consent prompts between tool execution and whatever UI is
/// listening on the wire.
///
/// Cheaply cloneable; all clones share the same pending-request table and
/// session whitelist.
#[derive(Clone)]
pub struct ApprovalMediator {
    inner: Arc<Inner>,
}

struct Inner {
    wire: Wire,
    pending: Arc<PendingTable>,
    whitelist: Mutex<HashSet<String>>,
    yolo: AtomicBool,
    timeout: Duration,
    listener: JoinHandle<()>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl ApprovalMediator {
    /// Build a mediator that publishes requests on `wire` and resolves them
    /// from `WireMessage::ApprovalResponse` replies on the same wire.
    #[must_use]
    pub fn new(wire: Wire, yolo: bool) -> Self {
        Self::with_timeout(wire, yolo, DEFAULT_APPROVAL_TIMEOUT)
    }

    /// Build a mediator with a non-default response timeout.
    #[must_use]
    pub fn with_timeout(wire: Wire, yolo: bool, timeout: Duration) -> Self {
        let pending: Arc<PendingTable> = Arc::new(DashMap::new());
        let listener = tokio::spawn(listen(wire.subscribe(), Arc::clone(&pending)));
        Self {
            inner: Arc::new(Inner {
                wire,
                pending,
                whitelist: Mutex::new(HashSet::new()),
                yolo: AtomicBool::new(yolo),
                timeout,
                listener,
            }),
        }
    }

    /// Enable or disable the YOLO bypass (auto-approve every request).
    pub fn set_yolo(&self, yolo: bool) {
        self.inner.yolo.store(yolo, Ordering::Relaxed);
    }

    /// `true` if the YOLO bypass is currently active.
    #[must_use]
    pub fn yolo(&self) -> bool {
        self.inner.yolo.load(Ordering::Relaxed)
    }

    /// Request consent for `action` on behalf of `tool_call_id`.
    ///
    /// Resolves without touching the wire if YOLO is enabled or `action` is
    /// already whitelisted for this session; otherwise publishes an
    /// [`WireMessage::ApprovalRequest`] and waits for the matching response.
    pub async fn request(
        &self,
        tool_call_id: impl Into<String>,
        sender: impl Into<String>,
        action: impl Into<String>,
        description: impl Into<String>,
        display_blocks: Option<Vec<Value>>,
    ) -> ApprovalResult<ApprovalDecision> {
        let action = action.into();

        if self.yolo() {
            return Ok(ApprovalDecision::ApproveOnce);
        }
        if self.inner.whitelist.lock().await.contains(&action) {
            return Ok(ApprovalDecision::ApproveOnce);
        }
        if self.inner.wire.subscriber_count() == 0 {
            return Err(ApprovalError::NoHandler);
        }

        let request_id = RequestId::new();
        let (tx, rx) = oneshot::channel();
        self.inner.pending.insert(request_id, tx);

        self.inner.wire.send(WireMessage::ApprovalRequest {
            request_id,
            tool_call_id: tool_call_id.into(),
            sender: sender.into(),
            action: action.clone(),
            description: description.into(),
            display_blocks,
        });

        let decision = match tokio::time::timeout(self.inner.timeout, rx).await {
            Ok(Ok(decision)) => decision,
            Ok(Err(_)) | Err(_) => {
                self.inner.pending.remove(&request_id);
                return Err(ApprovalError::Timeout(self.inner.timeout));
            },
        };

        if decision == ApprovalDecision::ApproveForSession {
            self.inner.whitelist.lock().await.insert(action);
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yolo_bypasses_the_wire_entirely() {
        let wire = Wire::new();
        let mediator = ApprovalMediator::new(wire, true);
        let decision = mediator
            .request("call_1", "shell", "shell:execute", "run a command", None)
            .await
            .unwrap();
        assert_eq!(decision, ApprovalDecision::ApproveOnce);
    }

    #[tokio::test]
    async fn approve_for_session_whitelists_the_action() {
        let wire = Wire::new();
        let mediator = ApprovalMediator::new(wire.clone(), false);
        let mut ui = wire.subscribe();

        let respond = tokio::spawn({
            let wire = wire.clone();
            async move {
                let msg = ui.recv().await.unwrap();
                let WireMessage::ApprovalRequest { request_id, .. } = msg.as_ref() else {
                    panic!("expected ApprovalRequest");
                };
                wire.send(WireMessage::ApprovalResponse {
                    request_id: *request_id,
                    decision: ApprovalDecision::ApproveForSession,
                });
            }
        });

        let decision = mediator
            .request("call_1", "shell", "shell:execute", "run a command", None)
            .await
            .unwrap();
        respond.await.unwrap();
        assert_eq!(decision, ApprovalDecision::ApproveForSession);

        // Second request for the same action resolves locally, no wire round-trip.
        let decision = mediator
            .request("call_2", "shell", "shell:execute", "run another", None)
            .await
            .unwrap();
        assert_eq!(decision, ApprovalDecision::ApproveOnce);
    }

    #[tokio::test]
    async fn no_subscribers_is_reported_as_no_handler() {
        let wire = Wire::new();
        let mediator = ApprovalMediator::new(wire, false);
        let err = mediator
            .request("call_1", "shell", "shell:execute", "run", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApprovalError::NoHandler));
    }

    #[tokio::test]
    async fn unanswered_request_times_out() {
        let wire = Wire::new();
        let mediator = ApprovalMediator::with_timeout(wire.clone(), false, Duration::from_millis(20));
        let _ui = wire.subscribe();
        let err = mediator
            .request("call_1", "shell", "shell:execute", "run", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApprovalError::Timeout(_)));
    }
}

async fn listen(mut rx: loom_wire::WireReceiver, pending: Arc<PendingTable>) {
    while let Some(msg) = rx.recv().await {
        if let WireMessage::ApprovalResponse { request_id, decision } = msg.as_ref() {
            if let Some((_, tx)) = pending.remove(request_id) {
                let _ = tx.send(*decision);
            } else {
                warn!(?request_id, "approval response with no matching pending request");
            }
        }
    }
}
