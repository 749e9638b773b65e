//! Commonly used types for convenient import.

pub use crate::strategies::{HidingThenSummaryStrategy, LlmSummaryStrategy, ToolResultHidingStrategy};
pub use crate::strategy::{CompactionContext, CompactionStrategy};
