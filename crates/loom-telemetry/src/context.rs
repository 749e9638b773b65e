//! Request context for correlating log lines across one turn of a session.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use loom_core::{SessionId, TurnId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation context for one unit of work (a step, a tool call, a
/// subagent run) within a session's turn.
///
/// Every [`crate::RequestContext`] carries the owning session and, once a
/// turn has begun, that turn's id — so log lines from a subagent spawned
/// mid-turn can be traced back to the turn that spawned it via
/// `correlation_id`/`parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Unique id of this context.
    pub request_id: Uuid,
    /// Shared by every context descended from the same root (the turn that
    /// started it all).
    pub correlation_id: Uuid,
    /// The context this one was spawned from, if any.
    pub parent_id: Option<Uuid>,
    /// Session this unit of work belongs to.
    pub session_id: SessionId,
    /// Turn this unit of work belongs to, once one has begun.
    pub turn_id: Option<TurnId>,
    /// When this context was created.
    pub started_at: DateTime<Utc>,
    /// Component that created this context, e.g. `"soul"`, `"subagent"`.
    pub source: String,
    /// Operation being performed, e.g. `"step"`, `"compact"`.
    pub operation: Option<String>,
    /// Free-form metadata attached for logging.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl RequestContext {
    /// Start a new root context for `session_id`, created by `source`.
    #[must_use]
    pub fn new(session_id: SessionId, source: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        Self {
            request_id: id,
            correlation_id: id,
            parent_id: None,
            session_id,
            turn_id: None,
            started_at: Utc::now(),
            source: source.into(),
            operation: None,
            metadata: HashMap::new(),
        }
    }

    /// Create a child context that inherits correlation and session info.
    #[must_use]
    pub fn child(&self, source: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            correlation_id: self.correlation_id,
            parent_id: Some(self.request_id),
            session_id: self.session_id,
            turn_id: self.turn_id,
            started_at: Utc::now(),
            source: source.into(),
            operation: None,
            metadata: self.metadata.clone(),
        }
    }

    /// Attach the turn this context belongs to.
    #[must_use]
    pub fn with_turn(mut self, turn_id: TurnId) -> Self {
        self.turn_id = Some(turn_id);
        self
    }

    /// Set the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Attach a metadata key/value pair.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Time elapsed since this context was created.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        #[allow(clippy::arithmetic_side_effects)]
        let elapsed = Utc::now() - self.started_at;
        elapsed
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed().num_milliseconds()
    }

    /// A `tracing` span carrying this context's correlation fields.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        let turn_id = self.turn_id.map(|t| t.to_string());
        tracing::info_span!(
            "request",
            request_id = %self.request_id,
            correlation_id = %self.correlation_id,
            session_id = %self.session_id,
            turn_id = turn_id.as_deref(),
            source = %self.source,
            operation = self.operation.as_deref(),
        )
    }

    /// Whether this context was spawned from another.
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Guard that logs entry/exit of a [`RequestContext`]'s span and its elapsed
/// time on drop.
pub struct RequestGuard {
    context: RequestContext,
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl RequestGuard {
    /// Enter `context`'s span, logging start and (on drop) completion.
    #[must_use]
    pub fn new(context: RequestContext) -> Self {
        let span = context.span().entered();
        tracing::debug!("request started");
        Self { context, span }
    }

    /// The context this guard was built from.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        tracing::debug!(elapsed_ms = self.context.elapsed_ms(), "request completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_its_own_correlation_root() {
        let ctx = RequestContext::new(SessionId::new(), "soul");
        assert_eq!(ctx.request_id, ctx.correlation_id);
        assert!(!ctx.has_parent());
        assert!(ctx.turn_id.is_none());
    }

    #[test]
    fn child_inherits_correlation_and_session_but_not_request_id() {
        let session = SessionId::new();
        let turn = TurnId::new();
        let parent = RequestContext::new(session, "soul").with_turn(turn).with_metadata("k", "v");

        let child = parent.child("subagent");

        assert_ne!(child.request_id, parent.request_id);
        assert_eq!(child.correlation_id, parent.correlation_id);
        assert_eq!(child.parent_id, Some(parent.request_id));
        assert_eq!(child.session_id, parent.session_id);
        assert_eq!(child.turn_id, parent.turn_id);
        assert_eq!(child.metadata.get("k"), Some(&"v".to_string()));
        assert!(child.has_parent());
    }

    #[test]
    fn elapsed_grows_over_time() {
        let ctx = RequestContext::new(SessionId::new(), "soul");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(ctx.elapsed_ms() >= 10);
    }

    #[test]
    fn round_trips_through_json() {
        let ctx = RequestContext::new(SessionId::new(), "soul").with_operation("step");
        let json = serde_json::to_string(&ctx).unwrap();
        let parsed: RequestContext = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.source, "soul");
        assert_eq!(parsed.operation, Some("step".to_string()));
        assert_eq!(parsed.session_id, ctx.session_id);
    }
}
