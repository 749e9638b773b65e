//! Commonly used types for convenient import.
//!
//! ```
//! use loom_core::prelude::*;
//! let msg = Message::user("hi");
//! assert_eq!(msg.role, Role::User);
//! ```

pub use crate::ids::{CheckpointId, RequestId, SessionId, TurnId};
pub use crate::message::{ApprovalDecision, Message, Part, Role};
pub use crate::timestamp::Timestamp;
