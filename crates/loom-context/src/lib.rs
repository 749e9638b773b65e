//! Loom Context — the durable, append-only conversation journal (spec §4.2,
//! component C2).
//!
//! `context.jsonl` is written one JSON object per line and never truncated.
//! Rewinding to an earlier checkpoint (the D-Mail operation) is expressed as
//! a new append, not a file edit, so the journal remains a faithful audit
//! trail of everything that happened, including reverted branches.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod context;
mod error;
mod journal;
pub mod prelude;

pub use context::Context;
pub use error::{ContextError, ContextResult};
