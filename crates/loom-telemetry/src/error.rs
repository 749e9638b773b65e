//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while configuring or initializing telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The `LogConfig` could not be turned into a valid filter (bad level or
    /// directive syntax).
    #[error("telemetry config error: {0}")]
    Config(String),

    /// `tracing_subscriber`'s global subscriber was already installed, or
    /// some other part of initialization failed.
    #[error("telemetry init error: {0}")]
    Init(String),

    /// Creating the log directory (file target) failed.
    #[error("telemetry io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
