//! Aggregate payment figures for the dashboard widgets.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::money::{format_amount, round_to_cents};
use crate::domain::ports::{PaymentQuery, PaymentRepository};
use crate::domain::{DocumentId, Error, Payment, PaymentStatus};

/// Number of payments in the recent-activity widget.
pub const RECENT_PAYMENTS_LIMIT: usize = 5;

/// Payment row pre-formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecentPayment {
    /// Payment identifier.
    pub id: DocumentId,
    /// Customer display name.
    #[schema(example = "Asha Verma")]
    pub customer: String,
    /// Amount with currency symbol.
    #[schema(example = "₹1500")]
    pub amount: String,
    /// Creation date as `M/D/YYYY`.
    #[schema(example = "3/15/2026")]
    pub date: String,
    /// Collection state.
    pub status: PaymentStatus,
}

fn month_day_year(at: DateTime<Utc>) -> String {
    format!("{}/{}/{}", at.month(), at.day(), at.year())
}

impl From<Payment> for RecentPayment {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            amount: format_amount(payment.record.amount),
            date: month_day_year(payment.record.created_at),
            customer: payment.record.customer,
            status: payment.record.status,
        }
    }
}

/// Read-only payment aggregates.
#[derive(Clone)]
pub struct DashboardService {
    payments: Arc<dyn PaymentRepository>,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    /// Create a service over the payment store.
    pub fn new(payments: Arc<dyn PaymentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { payments, clock }
    }

    /// Sum of pending payments dated before today (UTC).
    pub async fn overdue_amount(&self) -> Result<f64, Error> {
        let today = self.clock.utc().date_naive();
        let query = PaymentQuery::default()
            .with_status(PaymentStatus::Pending)
            .dated_before(today);
        Ok(self.payments.sum_amount(&query).await?)
    }

    /// Sum of paid payments.
    pub async fn total_collected(&self) -> Result<f64, Error> {
        let query = PaymentQuery::default().with_status(PaymentStatus::Paid);
        Ok(self.payments.sum_amount(&query).await?)
    }

    /// Paid share of all payment value as a percentage with two decimals.
    ///
    /// Zero when nothing has been recorded.
    pub async fn collection_rate(&self) -> Result<f64, Error> {
        let paid = self.total_collected().await?;
        let total = self.payments.sum_amount(&PaymentQuery::default()).await?;
        if total <= 0.0 {
            return Ok(0.0);
        }
        Ok(round_to_cents(paid / total * 100.0))
    }

    /// The newest payments by creation time.
    pub async fn recent_payments(&self) -> Result<Vec<RecentPayment>, Error> {
        let query = PaymentQuery::default()
            .newest_first()
            .limit(RECENT_PAYMENTS_LIMIT);
        let payments = self.payments.list(&query).await?;
        Ok(payments.into_iter().map(RecentPayment::from).collect())
    }
}
