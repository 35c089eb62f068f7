//! Customer management service.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::CustomerRepository;
use crate::domain::{
    Customer, CustomerInput, CustomerPatch, DocumentId, Error, NewCustomer, NotificationDraft,
    NotificationService,
};

/// Maximum number of customers returned by [`CustomerService::list`].
pub const CUSTOMER_LIST_LIMIT: usize = 1000;

fn customer_not_found() -> Error {
    Error::not_found("Customer not found")
}

/// Creates, reads, updates, and deletes customers.
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
}

impl CustomerService {
    /// Create a service over the customer store.
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        notifications: NotificationService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            customers,
            notifications,
            clock,
        }
    }

    async fn store(&self, customer: NewCustomer) -> Result<Customer, Error> {
        let now = self.clock.utc();
        let stored = self.customers.insert(&customer.into_record(now)).await?;
        self.notifications
            .dispatch(NotificationDraft::new_customer(&stored, now))
            .await?;
        Ok(stored)
    }

    /// Validate and store a customer, then announce it.
    pub async fn create(&self, input: CustomerInput) -> Result<Customer, Error> {
        let today = self.clock.utc().date_naive();
        let customer = NewCustomer::validate(input, today)?;
        let stored = self.store(customer).await?;
        info!(id = %stored.id, "customer created");
        Ok(stored)
    }

    /// Validate every row first, then store and announce each in order.
    ///
    /// Rows are numbered from 1. The first invalid row aborts the import
    /// before anything is written.
    pub async fn import(&self, rows: Vec<CustomerInput>) -> Result<Vec<Customer>, Error> {
        let today = self.clock.utc().date_naive();
        let validated = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                NewCustomer::validate(row, today).map_err(|errors| {
                    let row = index + 1;
                    Error::invalid_request(format!("Invalid data in row {row}")).with_details(
                        json!({ "row": row, "errors": errors.violations() }),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut stored = Vec::with_capacity(validated.len());
        for customer in validated {
            stored.push(self.store(customer).await?);
        }
        info!(count = stored.len(), "customers imported");
        Ok(stored)
    }

    /// Up to [`CUSTOMER_LIST_LIMIT`] customers.
    pub async fn list(&self) -> Result<Vec<Customer>, Error> {
        Ok(self.customers.list(CUSTOMER_LIST_LIMIT).await?)
    }

    /// Fetch one customer.
    pub async fn get(&self, id: &DocumentId) -> Result<Customer, Error> {
        self.customers
            .find(id)
            .await?
            .ok_or_else(customer_not_found)
    }

    /// Apply the fields present in `input` and return the updated customer.
    pub async fn update(&self, id: &DocumentId, input: CustomerInput) -> Result<Customer, Error> {
        let today = self.clock.utc().date_naive();
        let patch = CustomerPatch::validate(input, today)?;
        if !self.customers.update(id, &patch).await? {
            return Err(customer_not_found());
        }
        self.get(id).await
    }

    /// Remove a customer.
    pub async fn delete(&self, id: &DocumentId) -> Result<(), Error> {
        if !self.customers.delete(id).await? {
            return Err(customer_not_found());
        }
        info!(%id, "customer deleted");
        Ok(())
    }

    /// Number of stored customers.
    pub async fn count(&self) -> Result<u64, Error> {
        Ok(self.customers.count().await?)
    }
}

#[cfg(test)]
#[path = "customer_service_tests.rs"]
mod tests;
