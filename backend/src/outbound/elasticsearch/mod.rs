//! Elasticsearch-backed repositories.
//!
//! Each entity lives in its own index. Documents carry the entity body as
//! `_source`; the store-assigned `_id` becomes the entity identifier (user
//! accounts use their UUID as `_id`).

mod client;
mod customers;
mod dto;
mod indices;
mod notifications;
mod payments;
mod queries;
mod users;

pub use client::{ElasticsearchClient, ElasticsearchConfig};
pub use customers::ElasticsearchCustomerRepository;
pub use indices::ensure_indices;
pub use notifications::ElasticsearchNotificationRepository;
pub use payments::ElasticsearchPaymentRepository;
pub use users::ElasticsearchUserRepository;

use crate::domain::DocumentId;
use crate::domain::ports::DocumentStoreError;

fn document_id(raw: String) -> Result<DocumentId, DocumentStoreError> {
    DocumentId::new(raw)
        .map_err(|error| DocumentStoreError::decode(format!("unusable document id: {error}")))
}
