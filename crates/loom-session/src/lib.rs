//! Loom Session — on-disk session layout and per-workdir metadata (spec §4.8,
//! component C8).
//!
//! A session owns `sessions/<hash12(workdir)>/<session_id>/` containing the
//! context journal and the wire recorder's output. A separate, single-file
//! store outside any session directory tracks per-workdir metadata: the
//! last session used there and a sticky thinking-effort preference.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod error;
mod metadata;
mod paths;
pub mod prelude;
mod session;

pub use error::{SessionError, SessionResult};
pub use metadata::{MetadataStore, WorkdirMetadata};
pub use paths::LoomHome;
pub use session::{Session, hash12};
