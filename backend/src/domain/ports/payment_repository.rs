//! Port for payment persistence and aggregation.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DocumentId, Payment, PaymentRecord, PaymentStatus};

use super::DocumentStoreError;

/// Filter and ordering for payment reads.
///
/// # Examples
/// ```
/// use backend::domain::ports::PaymentQuery;
/// use backend::domain::PaymentStatus;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 15).expect("date");
/// let overdue = PaymentQuery::default()
///     .with_status(PaymentStatus::Pending)
///     .dated_before(today);
/// assert_eq!(overdue.status, Some(PaymentStatus::Pending));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentQuery {
    /// Exact customer match.
    pub customer_id: Option<DocumentId>,
    /// Exact status match.
    pub status: Option<PaymentStatus>,
    /// Only payments whose `date` is strictly earlier.
    pub date_before: Option<NaiveDate>,
    /// Order by `createdAt`, newest first.
    pub newest_first: bool,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl PaymentQuery {
    /// Restrict to one customer.
    pub fn for_customer(mut self, customer_id: DocumentId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Restrict to one status.
    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to payments dated before `date`.
    pub fn dated_before(mut self, date: NaiveDate) -> Self {
        self.date_before = Some(date);
        self
    }

    /// Order newest first.
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `payment` satisfies every filter.
    pub fn matches(&self, payment: &Payment) -> bool {
        let record = &payment.record;
        self.customer_id
            .as_ref()
            .is_none_or(|id| *id == record.customer_id)
            && self.status.is_none_or(|status| status == record.status)
            && self.date_before.is_none_or(|date| record.date < date)
    }
}

/// Storage for payment documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Store a new payment and return it with its assigned identifier.
    async fn insert(&self, record: &PaymentRecord) -> Result<Payment, DocumentStoreError>;

    /// Fetch one payment.
    async fn find(&self, id: &DocumentId) -> Result<Option<Payment>, DocumentStoreError>;

    /// Payments matching `query`.
    async fn list(&self, query: &PaymentQuery) -> Result<Vec<Payment>, DocumentStoreError>;

    /// Set the status; returns `false` when the payment does not exist.
    async fn update_status(
        &self,
        id: &DocumentId,
        status: PaymentStatus,
    ) -> Result<bool, DocumentStoreError>;

    /// Sum of `amount` over payments matching `query`, ignoring its limit.
    async fn sum_amount(&self, query: &PaymentQuery) -> Result<f64, DocumentStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).expect("date")
    }

    #[fixture]
    fn payment() -> Payment {
        Payment {
            id: DocumentId::new("pay-1").expect("id"),
            record: PaymentRecord {
                customer: "Asha Verma".into(),
                customer_id: DocumentId::new("cust-1").expect("id"),
                amount: 100.0,
                date: date(10),
                status: PaymentStatus::Pending,
                created_at: Utc::now(),
            },
        }
    }

    #[rstest]
    #[case(PaymentQuery::default(), true)]
    #[case(PaymentQuery::default().with_status(PaymentStatus::Paid), false)]
    #[case(PaymentQuery::default().dated_before(date(10)), false)]
    #[case(PaymentQuery::default().dated_before(date(11)), true)]
    #[case(PaymentQuery::default().for_customer(DocumentId::new("cust-2").expect("id")), false)]
    fn filters(payment: Payment, #[case] query: PaymentQuery, #[case] expected: bool) {
        assert_eq!(query.matches(&payment), expected);
    }
}
