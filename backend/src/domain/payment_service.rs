//! Payment recording service.
//!
//! Each mutation stores the payment, dispatches one notification, and pushes
//! the payment itself on the `dashboard-updates` channel.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::notification_service::publish_logged;
use crate::domain::ports::{EventPublisher, LiveEventKind, PaymentQuery, PaymentRepository};
use crate::domain::validation::ValidationErrors;
use crate::domain::{
    DocumentId, Error, NewPayment, NotificationDraft, NotificationService, Payment, PaymentInput,
    PaymentStatus,
};

/// Maximum number of payments returned by [`PaymentService::list`].
pub const PAYMENT_LIST_LIMIT: usize = 1000;

fn payment_not_found() -> Error {
    Error::not_found("Payment not found")
}

/// Records payments and status changes.
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    notifications: NotificationService,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl PaymentService {
    /// Create a service over the payment store.
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        notifications: NotificationService,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            payments,
            notifications,
            publisher,
            clock,
        }
    }

    async fn reread(&self, id: &DocumentId) -> Result<Payment, Error> {
        self.payments.find(id).await?.ok_or_else(payment_not_found)
    }

    /// Payments, optionally restricted to one customer.
    pub async fn list(&self, customer_id: Option<DocumentId>) -> Result<Vec<Payment>, Error> {
        let mut query = PaymentQuery::default().limit(PAYMENT_LIST_LIMIT);
        if let Some(customer_id) = customer_id {
            query = query.for_customer(customer_id);
        }
        Ok(self.payments.list(&query).await?)
    }

    /// Validate and record a payment.
    pub async fn create(&self, input: PaymentInput) -> Result<Payment, Error> {
        let now = self.clock.utc();
        let payment = NewPayment::validate(input, now.date_naive())?;
        let inserted = self.payments.insert(&payment.into_record(now)).await?;
        let stored = self.reread(&inserted.id).await?;
        info!(id = %stored.id, status = %stored.record.status, "payment recorded");

        self.notifications
            .dispatch(NotificationDraft::payment_recorded(&stored, now))
            .await?;
        publish_logged(self.publisher.as_ref(), LiveEventKind::NewPayment, &stored).await;
        Ok(stored)
    }

    /// Change a payment's status.
    pub async fn update_status(
        &self,
        id: &DocumentId,
        status: Option<String>,
    ) -> Result<Payment, Error> {
        let raw = status
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(|| Error::invalid_request("Payment ID and status are required"))?;
        let mut errors = ValidationErrors::new();
        let status = errors.check(PaymentStatus::parse("status", &raw));
        let status = errors.finish(|| status)?;

        if !self.payments.update_status(id, status).await? {
            return Err(payment_not_found());
        }
        let updated = self.reread(id).await?;
        info!(%id, %status, "payment status updated");

        let now = self.clock.utc();
        self.notifications
            .dispatch(NotificationDraft::payment_status_changed(&updated, now))
            .await?;
        publish_logged(
            self.publisher.as_ref(),
            LiveEventKind::PaymentUpdated,
            &updated,
        )
        .await;
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "payment_service_tests.rs"]
mod tests;
