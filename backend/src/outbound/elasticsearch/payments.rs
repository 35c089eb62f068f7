//! Payment documents in the `payments` index.

use async_trait::async_trait;
use serde_json::json;

use super::indices::PAYMENTS;
use super::queries::{payment_filter, payment_search};
use super::{ElasticsearchClient, document_id};
use crate::domain::ports::{DocumentStoreError, PaymentQuery, PaymentRepository};
use crate::domain::{DocumentId, Payment, PaymentRecord, PaymentStatus};

/// Result window used when a query sets no limit.
const DEFAULT_SEARCH_SIZE: usize = 10_000;

/// [`PaymentRepository`] over Elasticsearch.
#[derive(Clone)]
pub struct ElasticsearchPaymentRepository {
    client: ElasticsearchClient,
}

impl ElasticsearchPaymentRepository {
    /// Wrap a shared client.
    pub fn new(client: ElasticsearchClient) -> Self {
        Self { client }
    }
}

fn into_payment((id, record): (String, PaymentRecord)) -> Result<Payment, DocumentStoreError> {
    Ok(Payment {
        id: document_id(id)?,
        record,
    })
}

#[async_trait]
impl PaymentRepository for ElasticsearchPaymentRepository {
    async fn insert(&self, record: &PaymentRecord) -> Result<Payment, DocumentStoreError> {
        let id = self.client.index_document(PAYMENTS, record).await?;
        into_payment((id, record.clone()))
    }

    async fn find(&self, id: &DocumentId) -> Result<Option<Payment>, DocumentStoreError> {
        self.client
            .get_document::<PaymentRecord>(PAYMENTS, id.as_str())
            .await?
            .map(into_payment)
            .transpose()
    }

    async fn list(&self, query: &PaymentQuery) -> Result<Vec<Payment>, DocumentStoreError> {
        let body = payment_search(query, DEFAULT_SEARCH_SIZE);
        self.client
            .search::<PaymentRecord>(PAYMENTS, &body)
            .await?
            .into_iter()
            .map(into_payment)
            .collect()
    }

    async fn update_status(
        &self,
        id: &DocumentId,
        status: PaymentStatus,
    ) -> Result<bool, DocumentStoreError> {
        self.client
            .update_document(PAYMENTS, id.as_str(), &json!({ "status": status }))
            .await
    }

    async fn sum_amount(&self, query: &PaymentQuery) -> Result<f64, DocumentStoreError> {
        self.client
            .sum(PAYMENTS, &payment_filter(query), "amount")
            .await
    }
}
