//! Commonly used types for convenient import.

pub use crate::error::{SessionError, SessionResult};
pub use crate::metadata::{MetadataStore, WorkdirMetadata};
pub use crate::paths::LoomHome;
pub use crate::session::{Session, hash12};
