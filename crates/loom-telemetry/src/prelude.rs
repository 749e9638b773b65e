//! Commonly used types for convenient import.

pub use crate::context::{RequestContext, RequestGuard};
pub use crate::error::{TelemetryError, TelemetryResult};
pub use crate::logging::{FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
