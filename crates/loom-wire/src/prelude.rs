//! Commonly used types for convenient import.

pub use crate::bus::{DEFAULT_CHANNEL_CAPACITY, Wire, WireReceiver};
pub use crate::message::WireMessage;
pub use crate::recorder::{RecorderError, WireRecorder};
