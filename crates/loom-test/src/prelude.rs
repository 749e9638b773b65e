//! Commonly used types for convenient import.

pub use crate::harness::{TestHarness, test_harness};
pub use crate::mock_approval::MockApprovalHandler;
pub use crate::mock_llm::{MockError, MockLlmProvider, MockToolCall, MockTurn};
