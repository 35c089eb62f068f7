//! Notification log service.
//!
//! Every customer or payment mutation calls [`NotificationService::dispatch`]
//! exactly once: the notification is stored, then announced on the
//! `notifications` channel.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{EventPublisher, LiveEvent, LiveEventKind, NotificationRepository};
use crate::domain::{DocumentId, Error, Notification, NotificationDraft};

/// Number of notifications returned by [`NotificationService::list`].
pub const NOTIFICATION_LIST_LIMIT: usize = 100;

/// Publish `payload` as `kind`, logging and discarding any failure.
pub(crate) async fn publish_logged<T: Serialize + ?Sized>(
    publisher: &dyn EventPublisher,
    kind: LiveEventKind,
    payload: &T,
) {
    let event = match LiveEvent::new(kind, payload) {
        Ok(event) => event,
        Err(error) => {
            warn!(channel = kind.channel(), event = kind.name(), %error, "live event payload did not serialise");
            return;
        }
    };
    match publisher.publish(&event).await {
        Ok(()) => debug!(channel = event.channel(), event = event.name(), "live event published"),
        Err(error) => warn!(
            channel = event.channel(),
            event = event.name(),
            %error,
            "live event publish failed"
        ),
    }
}

/// Stores notifications and pushes them to live subscribers.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl NotificationService {
    /// Create a service over the notification store and live publisher.
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Store `draft`, then publish it as `new-notification`.
    ///
    /// Store failures propagate; publish failures are logged only because
    /// the notification has already been written.
    pub async fn dispatch(&self, draft: NotificationDraft) -> Result<Notification, Error> {
        let stored = self.repository.insert(&draft).await?;
        debug!(id = %stored.id, kind = ?stored.draft.kind, "notification stored");
        publish_logged(
            self.publisher.as_ref(),
            LiveEventKind::NewNotification,
            &stored,
        )
        .await;
        Ok(stored)
    }

    /// Publish `draft` without storing it.
    pub async fn announce(&self, draft: &NotificationDraft) {
        publish_logged(self.publisher.as_ref(), LiveEventKind::NewNotification, draft).await;
    }

    /// Most recent notifications, newest first.
    pub async fn list(&self) -> Result<Vec<Notification>, Error> {
        Ok(self
            .repository
            .list_recent(NOTIFICATION_LIST_LIMIT)
            .await?)
    }

    /// Number of unread notifications.
    pub async fn unread_count(&self) -> Result<u64, Error> {
        Ok(self.repository.count_unread().await?)
    }

    /// Set the read flag and announce the change.
    pub async fn mark_read(&self, id: &DocumentId, read: bool) -> Result<(), Error> {
        if !self.repository.set_read(id, read).await? {
            return Err(Error::not_found("Notification not found"));
        }
        publish_logged(
            self.publisher.as_ref(),
            LiveEventKind::NotificationUpdated,
            &json!({ "id": id, "read": read }),
        )
        .await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
