//! Port for pushing live updates to connected dashboards.
//!
//! Events are fire-and-forget. Callers log failures and carry on; nothing
//! is retried.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::define_port_error;

/// Channel carrying notification events.
pub const NOTIFICATIONS_CHANNEL: &str = "notifications";
/// Channel carrying payment events for dashboard widgets.
pub const DASHBOARD_CHANNEL: &str = "dashboard-updates";

/// Every event the backend publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiveEventKind {
    /// A notification was created or an overdue warning raised.
    NewNotification,
    /// A notification's read flag changed.
    NotificationUpdated,
    /// A payment was recorded.
    NewPayment,
    /// A payment's status changed.
    PaymentUpdated,
}

impl LiveEventKind {
    /// Channel the event is published on.
    pub fn channel(self) -> &'static str {
        match self {
            Self::NewNotification | Self::NotificationUpdated => NOTIFICATIONS_CHANNEL,
            Self::NewPayment | Self::PaymentUpdated => DASHBOARD_CHANNEL,
        }
    }

    /// Event name within the channel.
    pub fn name(self) -> &'static str {
        match self {
            Self::NewNotification => "new-notification",
            Self::NotificationUpdated => "notification-updated",
            Self::NewPayment => "new-payment",
            Self::PaymentUpdated => "payment-updated",
        }
    }
}

/// A single published event.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveEvent {
    kind: LiveEventKind,
    payload: Value,
}

/// Wire frame used by socket subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct LiveEventFrame<'a> {
    /// Channel name.
    pub channel: &'static str,
    /// Event name.
    pub event: &'static str,
    /// Event payload.
    pub data: &'a Value,
}

impl LiveEvent {
    /// Build an event from any serialisable payload.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ports::{LiveEvent, LiveEventKind};
    /// use serde_json::json;
    ///
    /// let event = LiveEvent::new(LiveEventKind::NotificationUpdated, &json!({"id": "n-1", "read": true}))
    ///     .expect("payload serialises");
    /// assert_eq!(event.channel(), "notifications");
    /// assert_eq!(event.name(), "notification-updated");
    /// ```
    pub fn new<T: Serialize + ?Sized>(
        kind: LiveEventKind,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            kind,
            payload: serde_json::to_value(payload)?,
        })
    }

    /// Event kind.
    pub fn kind(&self) -> LiveEventKind {
        self.kind
    }

    /// Channel name.
    pub fn channel(&self) -> &'static str {
        self.kind.channel()
    }

    /// Event name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// JSON payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// `{channel, event, data}` frame for socket subscribers.
    pub fn frame(&self) -> LiveEventFrame<'_> {
        LiveEventFrame {
            channel: self.channel(),
            event: self.name(),
            data: &self.payload,
        }
    }
}

define_port_error! {
    /// Errors raised by live-update publishers.
    pub enum EventPublisherError {
        /// The relay could not be reached.
        Transport { message: String } =>
            "event relay unreachable: {message}",
        /// The relay rejected the event.
        Rejected { status: u16, message: String } =>
            "event relay rejected event with status {status}: {message}",
        /// The event could not be encoded.
        Encode { message: String } =>
            "event encoding failed: {message}",
    }
}

/// Sink for live updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one event.
    async fn publish(&self, event: &LiveEvent) -> Result<(), EventPublisherError>;
}
