//! Publisher that remembers what it was asked to send.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{EventPublisher, EventPublisherError, LiveEvent};

/// Records every published event; can be switched to fail.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<LiveEvent>>,
    failing: Mutex<bool>,
}

impl RecordingPublisher {
    /// Make subsequent publishes fail (events are still recorded).
    pub fn fail_with_transport_error(&self) {
        *lock(&self.failing) = true;
    }

    /// Events published so far.
    pub fn events(&self) -> Vec<LiveEvent> {
        lock(&self.events).clone()
    }

    /// `(channel, event)` pairs published so far.
    pub fn names(&self) -> Vec<(&'static str, &'static str)> {
        lock(&self.events)
            .iter()
            .map(|event| (event.channel(), event.name()))
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("publisher mutex"),
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &LiveEvent) -> Result<(), EventPublisherError> {
        lock(&self.events).push(event.clone());
        if *lock(&self.failing) {
            return Err(EventPublisherError::transport("recording publisher set to fail"));
        }
        Ok(())
    }
}
