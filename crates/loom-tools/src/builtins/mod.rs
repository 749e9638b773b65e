//! Built-in tools required by the core's own semantics.
//!
//! The general-purpose tool library (file I/O, shell, web, search) is out of
//! scope; these two are the only tools the agent loop itself depends on.

mod send_dmail;
mod task;

pub use send_dmail::SendDMailTool;
pub use task::TaskTool;
