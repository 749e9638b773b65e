//! Loom Core — shared message, identifier, and error types for the Loom
//! agent execution core.
//!
//! This crate has no dependency on any other `loom-*` crate; it is the
//! vocabulary every other component speaks.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod ids;
pub mod message;
pub mod prelude;
pub mod timestamp;

pub use ids::{CheckpointId, RequestId, SessionId, TurnId};
pub use message::{ApprovalDecision, Message, Part, Role};
pub use timestamp::Timestamp;
