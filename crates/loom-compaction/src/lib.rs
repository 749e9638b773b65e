//! Loom Compaction — history-reduction strategies (spec §4.5, component C5).
//!
//! A [`CompactionStrategy`] trims a [`loom_core::Message`] history to fit a
//! model's context window without breaking the invariant that every
//! assistant tool call is still followed by a matching tool message.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod grouping;
pub mod prelude;
pub mod strategies;
mod strategy;

pub use strategy::{CompactionContext, CompactionStrategy};
