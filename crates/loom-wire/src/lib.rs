//! Loom Wire — the event/request bus between the agent core and any number
//! of UIs (spec §4.1, component C1).
//!
//! The wire is a single-producer, multi-consumer broadcast channel. Sends
//! never block and never fail; slow subscribers drop the oldest buffered
//! messages rather than stall the producer. Approval request/response
//! pairing is layered on top by `loom-approval`, not by this crate — the
//! wire only transports [`WireMessage`] envelopes.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod bus;
pub mod message;
pub mod prelude;
pub mod recorder;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, Wire, WireReceiver};
pub use message::WireMessage;
pub use recorder::{RecorderError, WireRecorder};
