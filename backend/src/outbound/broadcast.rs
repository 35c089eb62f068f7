//! In-process fan-out to WebSocket subscribers.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::ports::{EventPublisher, EventPublisherError, LiveEvent};

/// Events buffered per subscriber before the slowest starts lagging.
pub const DEFAULT_CAPACITY: usize = 256;

/// [`EventPublisher`] that relays events to local subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<LiveEvent>,
}

impl BroadcastPublisher {
    /// Publisher buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.sender.subscribe()
    }

    /// Currently attached subscribers.
    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(&self, event: &LiveEvent) -> Result<(), EventPublisherError> {
        // No subscribers is not a failure.
        if let Ok(delivered) = self.sender.send(event.clone()) {
            trace!(delivered, event = event.name(), "event broadcast");
        }
        Ok(())
    }
}
