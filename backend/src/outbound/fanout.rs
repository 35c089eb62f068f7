//! Publisher that forwards every event to several relays.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{EventPublisher, EventPublisherError, LiveEvent};

/// Sends each event to every inner publisher in order.
///
/// A failing relay does not stop delivery to the rest; the first error is
/// returned once all have been tried.
#[derive(Clone, Default)]
pub struct FanoutPublisher {
    targets: Vec<Arc<dyn EventPublisher>>,
}

impl FanoutPublisher {
    /// Add another relay.
    #[must_use]
    pub fn with(mut self, target: Arc<dyn EventPublisher>) -> Self {
        self.targets.push(target);
        self
    }
}

#[async_trait]
impl EventPublisher for FanoutPublisher {
    async fn publish(&self, event: &LiveEvent) -> Result<(), EventPublisherError> {
        let mut first_error = None;
        for target in &self.targets {
            if let Err(error) = target.publish(event).await {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
