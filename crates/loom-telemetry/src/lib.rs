//! Structured logging and request correlation, the ambient stack every
//! other crate in this workspace logs through.
//!
//! ```no_run
//! use loom_core::SessionId;
//! use loom_telemetry::prelude::*;
//!
//! # fn main() -> TelemetryResult<()> {
//! setup_logging(&LogConfig::new("debug").with_format(LogFormat::Pretty))?;
//!
//! let ctx = RequestContext::new(SessionId::new(), "soul").with_operation("step");
//! let _guard = RequestGuard::new(ctx);
//! tracing::info!("stepping");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod context;
mod error;
mod logging;
pub mod prelude;

pub use context::{RequestContext, RequestGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
