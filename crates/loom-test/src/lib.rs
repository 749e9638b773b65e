//! Loom Test — shared test doubles for the agent core (spec §8).
//!
//! A [`mock_llm::MockLlmProvider`] scripts `ChatProvider::step` replies, a
//! [`mock_approval::MockApprovalHandler`] plays the UI half of the approval
//! protocol, and [`harness::test_harness`] wires up a disposable
//! `Context`/`Wire`/`ApprovalMediator` trio in one call.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod harness;
pub mod mock_approval;
pub mod mock_llm;
pub mod prelude;

pub use harness::{TestHarness, test_harness};
pub use mock_approval::MockApprovalHandler;
pub use mock_llm::{MockError, MockLlmProvider, MockToolCall, MockTurn};
