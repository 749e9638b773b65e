//! The event bus: a single-producer, multi-consumer broadcast channel.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::message::WireMessage;

/// Default per-subscriber buffer capacity.
///
/// A slow subscriber that falls more than this many messages behind loses
/// the oldest ones (spec §4.1: "back-pressure is absorbed by per-subscriber
/// bounded buffers... it never blocks the producer").
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// The wire: broadcasts [`WireMessage`]s to every subscriber in send order.
///
/// Cloning a `Wire` shares the same underlying channel — all clones are the
/// same logical bus, matching `EventBus`'s sender-sharing `Clone` impl.
#[derive(Debug, Clone)]
pub struct Wire {
    sender: broadcast::Sender<Arc<WireMessage>>,
    capacity: usize,
}

impl Wire {
    /// Create a new wire with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new wire with the given per-subscriber buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    /// Send a message to every current subscriber. Never blocks, never
    /// fails: a channel with zero subscribers simply drops the message.
    pub fn send(&self, message: WireMessage) {
        let message = Arc::new(message);
        trace!(kind = message.kind(), "sending wire message");
        if let Ok(count) = self.sender.send(Arc::clone(&message)) {
            debug!(kind = message.kind(), receivers = count, "wire message delivered");
        } else {
            trace!(kind = message.kind(), "no wire subscribers");
        }
    }

    /// Subscribe to the wire. The returned [`WireReceiver`] only sees
    /// messages sent after this call (spec §4.1: "not replayed").
    #[must_use]
    pub fn subscribe(&self) -> WireReceiver {
        WireReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Current number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// The configured per-subscriber buffer capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Wire {
    fn default() -> Self {
        Self::new()
    }
}

/// A subscription to the [`Wire`].
pub struct WireReceiver {
    receiver: broadcast::Receiver<Arc<WireMessage>>,
}

impl WireReceiver {
    /// Await the next message.
    ///
    /// Returns `None` once the wire is closed (producer dropped). If this
    /// receiver fell behind, lagged messages are skipped and a warning is
    /// logged; the gap is never surfaced as an error to the caller.
    pub async fn recv(&mut self) -> Option<Arc<WireMessage>> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "wire receiver lagged, messages dropped");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking receive.
    pub fn try_recv(&mut self) -> Option<Arc<WireMessage>> {
        loop {
            match self.receiver.try_recv() {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "wire receiver lagged, messages dropped");
                },
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let wire = Wire::new();
        let mut rx = wire.subscribe();
        wire.send(WireMessage::TurnEnd);
        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.kind(), "turn_end");
    }

    #[tokio::test]
    async fn messages_before_subscribe_are_not_replayed() {
        let wire = Wire::new();
        wire.send(WireMessage::TurnEnd);
        let mut rx = wire.subscribe();
        wire.send(WireMessage::CompactionBegin);
        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.kind(), "compaction_begin");
    }

    #[tokio::test]
    async fn multiple_subscribers_each_get_every_message() {
        let wire = Wire::new();
        let mut a = wire.subscribe();
        let mut b = wire.subscribe();
        wire.send(WireMessage::TurnEnd);
        assert_eq!(a.recv().await.unwrap().kind(), "turn_end");
        assert_eq!(b.recv().await.unwrap().kind(), "turn_end");
    }

    #[tokio::test]
    async fn send_with_no_subscribers_does_not_panic() {
        let wire = Wire::new();
        wire.send(WireMessage::TurnEnd);
    }

    #[tokio::test]
    async fn ordering_is_preserved_per_subscriber() {
        let wire = Wire::new();
        let mut rx = wire.subscribe();
        wire.send(WireMessage::StepBegin { step_no: 1 });
        wire.send(WireMessage::StepBegin { step_no: 2 });
        wire.send(WireMessage::StepBegin { step_no: 3 });
        for expected in 1..=3 {
            let msg = rx.recv().await.unwrap();
            match msg.as_ref() {
                WireMessage::StepBegin { step_no } => assert_eq!(*step_no, expected),
                other => panic!("unexpected message: {other:?}"),
            }
        }
    }
}
