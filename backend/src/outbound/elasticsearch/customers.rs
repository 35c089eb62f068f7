//! Customer documents in the `customers` index.

use async_trait::async_trait;
use serde_json::json;

use super::indices::CUSTOMERS;
use super::queries::match_all;
use super::{ElasticsearchClient, document_id};
use crate::domain::ports::{CustomerRepository, DocumentStoreError};
use crate::domain::{Customer, CustomerPatch, CustomerRecord, DocumentId};

/// [`CustomerRepository`] over Elasticsearch.
#[derive(Clone)]
pub struct ElasticsearchCustomerRepository {
    client: ElasticsearchClient,
}

impl ElasticsearchCustomerRepository {
    /// Wrap a shared client.
    pub fn new(client: ElasticsearchClient) -> Self {
        Self { client }
    }
}

fn into_customer((id, record): (String, CustomerRecord)) -> Result<Customer, DocumentStoreError> {
    Ok(Customer {
        id: document_id(id)?,
        record,
    })
}

#[async_trait]
impl CustomerRepository for ElasticsearchCustomerRepository {
    async fn insert(&self, record: &CustomerRecord) -> Result<Customer, DocumentStoreError> {
        let id = self.client.index_document(CUSTOMERS, record).await?;
        into_customer((id, record.clone()))
    }

    async fn list(&self, limit: usize) -> Result<Vec<Customer>, DocumentStoreError> {
        let body = json!({ "query": match_all(), "size": limit });
        self.client
            .search::<CustomerRecord>(CUSTOMERS, &body)
            .await?
            .into_iter()
            .map(into_customer)
            .collect()
    }

    async fn find(&self, id: &DocumentId) -> Result<Option<Customer>, DocumentStoreError> {
        self.client
            .get_document::<CustomerRecord>(CUSTOMERS, id.as_str())
            .await?
            .map(into_customer)
            .transpose()
    }

    async fn update(
        &self,
        id: &DocumentId,
        patch: &CustomerPatch,
    ) -> Result<bool, DocumentStoreError> {
        self.client
            .update_document(CUSTOMERS, id.as_str(), patch)
            .await
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, DocumentStoreError> {
        self.client.delete_document(CUSTOMERS, id.as_str()).await
    }

    async fn count(&self) -> Result<u64, DocumentStoreError> {
        self.client.count(CUSTOMERS, &match_all()).await
    }
}
