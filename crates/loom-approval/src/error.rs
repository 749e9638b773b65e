//! Errors raised by the approval mediator.

use thiserror::Error;

/// Errors from [`crate::ApprovalMediator::request`].
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// No response arrived within the configured timeout.
    #[error("approval request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The wire has no subscribers, so the request could never be seen.
    #[error("no approval handler is subscribed to the wire")]
    NoHandler,
}

/// Convenience alias for approval-mediator results.
pub type ApprovalResult<T> = Result<T, ApprovalError>;
