//! Loom Tools — the toolset runtime (spec §4.4, component C4).
//!
//! Owns the tool registry and the per-call execution protocol. The general
//! tool library (file I/O, shell, web, search) is an external collaborator;
//! this crate only ships the two tools the agent loop's own semantics
//! require: `send_dmail` and `task`.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod builtins;
mod context;
mod error;
pub mod prelude;
mod protocol;
mod registry;

pub use context::{DMailSlot, SubagentRequest, SubagentResult, SubagentSpawner, ToolContext};
pub use error::{ToolError, ToolOutput, ToolResult};
pub use protocol::{ToolCallOutcome, dispatch_all, dispatch_one};
pub use registry::{BuiltinTool, ToolRegistry};
