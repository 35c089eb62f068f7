//! Account documents in the `users` index, keyed by UUID.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ElasticsearchClient;
use super::indices::USERS;
use super::queries::term;
use crate::domain::ports::{DocumentStoreError, UserRepository};
use crate::domain::{User, UserId};

/// Stored shape; the hash lives under `password`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    username: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password_hash.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl UserDocument {
    fn into_user(self, id: &str) -> Result<User, DocumentStoreError> {
        let id = UserId::new(id)
            .map_err(|error| DocumentStoreError::decode(format!("user id {id}: {error}")))?;
        Ok(User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// [`UserRepository`] over Elasticsearch.
#[derive(Clone)]
pub struct ElasticsearchUserRepository {
    client: ElasticsearchClient,
}

impl ElasticsearchUserRepository {
    /// Wrap a shared client.
    pub fn new(client: ElasticsearchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserRepository for ElasticsearchUserRepository {
    async fn insert(&self, user: &User) -> Result<(), DocumentStoreError> {
        self.client
            .put_document(USERS, &user.id.to_string(), &UserDocument::from(user))
            .await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DocumentStoreError> {
        self.client
            .get_document::<UserDocument>(USERS, &id.to_string())
            .await?
            .map(|(id, document)| document.into_user(&id))
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DocumentStoreError> {
        let body = json!({ "query": term("email", email), "size": 1 });
        self.client
            .search::<UserDocument>(USERS, &body)
            .await?
            .into_iter()
            .next()
            .map(|(id, document)| document.into_user(&id))
            .transpose()
    }
}
