//! Commonly used types for convenient import.

pub use crate::context::Context;
pub use crate::error::{ContextError, ContextResult};
