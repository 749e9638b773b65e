//! Commonly used types for convenient import.

pub use crate::config::AgentLoopConfig;
pub use crate::error::{SoulError, SoulResult};
pub use crate::soul::Soul;
pub use crate::subagent::SoulSpawner;
