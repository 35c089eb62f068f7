//! Port for customer persistence.

use async_trait::async_trait;

use crate::domain::{Customer, CustomerPatch, CustomerRecord, DocumentId};

use super::DocumentStoreError;

/// Storage for customer documents.
///
/// Writes are visible to the next read once they return.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Store a new customer and return it with its assigned identifier.
    async fn insert(&self, record: &CustomerRecord) -> Result<Customer, DocumentStoreError>;

    /// Return up to `limit` customers.
    async fn list(&self, limit: usize) -> Result<Vec<Customer>, DocumentStoreError>;

    /// Fetch one customer.
    async fn find(&self, id: &DocumentId) -> Result<Option<Customer>, DocumentStoreError>;

    /// Apply `patch`; returns `false` when the customer does not exist.
    async fn update(
        &self,
        id: &DocumentId,
        patch: &CustomerPatch,
    ) -> Result<bool, DocumentStoreError>;

    /// Remove a customer; returns `false` when it does not exist.
    async fn delete(&self, id: &DocumentId) -> Result<bool, DocumentStoreError>;

    /// Number of stored customers.
    async fn count(&self) -> Result<u64, DocumentStoreError>;
}
