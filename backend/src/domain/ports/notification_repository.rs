//! Port for the notification log.

use async_trait::async_trait;

use crate::domain::{DocumentId, Notification, NotificationDraft};

use super::DocumentStoreError;

/// Storage for notification documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a notification and return it with its assigned identifier.
    async fn insert(&self, draft: &NotificationDraft) -> Result<Notification, DocumentStoreError>;

    /// Up to `limit` notifications, newest `timestamp` first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Notification>, DocumentStoreError>;

    /// Number of notifications with `read == false`.
    async fn count_unread(&self) -> Result<u64, DocumentStoreError>;

    /// Set the read flag; returns `false` when the notification does not exist.
    async fn set_read(&self, id: &DocumentId, read: bool) -> Result<bool, DocumentStoreError>;
}
