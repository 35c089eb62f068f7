//! Notification documents in the `notifications` index.

use async_trait::async_trait;
use serde_json::json;

use super::indices::NOTIFICATIONS;
use super::queries::{match_all, term};
use super::{ElasticsearchClient, document_id};
use crate::domain::ports::{DocumentStoreError, NotificationRepository};
use crate::domain::{DocumentId, Notification, NotificationDraft};

/// [`NotificationRepository`] over Elasticsearch.
#[derive(Clone)]
pub struct ElasticsearchNotificationRepository {
    client: ElasticsearchClient,
}

impl ElasticsearchNotificationRepository {
    /// Wrap a shared client.
    pub fn new(client: ElasticsearchClient) -> Self {
        Self { client }
    }
}

fn into_notification(
    (id, draft): (String, NotificationDraft),
) -> Result<Notification, DocumentStoreError> {
    Ok(Notification {
        id: document_id(id)?,
        draft,
    })
}

#[async_trait]
impl NotificationRepository for ElasticsearchNotificationRepository {
    async fn insert(&self, draft: &NotificationDraft) -> Result<Notification, DocumentStoreError> {
        let id = self.client.index_document(NOTIFICATIONS, draft).await?;
        into_notification((id, draft.clone()))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Notification>, DocumentStoreError> {
        let body = json!({
            "query": match_all(),
            "size": limit,
            "sort": [{ "timestamp": { "order": "desc" } }],
        });
        self.client
            .search::<NotificationDraft>(NOTIFICATIONS, &body)
            .await?
            .into_iter()
            .map(into_notification)
            .collect()
    }

    async fn count_unread(&self) -> Result<u64, DocumentStoreError> {
        self.client
            .count(NOTIFICATIONS, &term("read", false))
            .await
    }

    async fn set_read(&self, id: &DocumentId, read: bool) -> Result<bool, DocumentStoreError> {
        self.client
            .update_document(NOTIFICATIONS, id.as_str(), &json!({ "read": read }))
            .await
    }
}
