//! Commonly used types for convenient import.

pub use crate::error::{ApprovalError, ApprovalResult};
pub use crate::mediator::{ApprovalMediator, DEFAULT_APPROVAL_TIMEOUT};
