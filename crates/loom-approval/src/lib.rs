//! Loom Approval — consent mediation between tool execution and the UI
//! (spec §4.3, component C3).
//!
//! Every sensitive tool call is bound to exactly one approval request; the
//! mediator never fans a single request out to multiple handlers and never
//! guesses at a decision beyond the session whitelist and YOLO bypass.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod error;
mod mediator;
pub mod prelude;

pub use error::{ApprovalError, ApprovalResult};
pub use mediator::{ApprovalMediator, DEFAULT_APPROVAL_TIMEOUT};
