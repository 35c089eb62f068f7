//! Periodic overdue-payment warnings.
//!
//! The sweep only publishes; nothing is written to the notification log, and
//! the same payment is announced again on every run until it is paid.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use serde::{Deserialize, Serialize};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::domain::ports::{PaymentQuery, PaymentRepository};
use crate::domain::{Error, NotificationDraft, NotificationService, PaymentStatus, TraceId};

/// Maximum number of overdue payments announced per run.
pub const OVERDUE_SWEEP_LIMIT: usize = 1000;

/// Result body of one sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OverdueSweepReport {
    /// Always `true` for a completed run.
    pub success: bool,
    /// Present when nothing was overdue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "No overdue payments.")]
    pub message: Option<String>,
    /// Number of warnings published, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl OverdueSweepReport {
    fn from_count(count: usize) -> Self {
        if count == 0 {
            Self {
                success: true,
                message: Some("No overdue payments.".to_owned()),
                count: None,
            }
        } else {
            Self {
                success: true,
                message: None,
                count: Some(count),
            }
        }
    }
}

/// Finds pending payments dated before today and warns about each.
#[derive(Clone)]
pub struct OverdueSweep {
    payments: Arc<dyn PaymentRepository>,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
}

impl OverdueSweep {
    /// Create a sweep over the payment store.
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        notifications: NotificationService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            payments,
            notifications,
            clock,
        }
    }

    /// Run once.
    pub async fn run(&self) -> Result<OverdueSweepReport, Error> {
        let now = self.clock.utc();
        let query = PaymentQuery::default()
            .with_status(PaymentStatus::Pending)
            .dated_before(now.date_naive())
            .limit(OVERDUE_SWEEP_LIMIT);
        let overdue = self.payments.list(&query).await?;

        for payment in &overdue {
            self.notifications
                .announce(&NotificationDraft::payment_overdue(payment, now))
                .await;
            info!(payment_id = %payment.id, customer = %payment.record.customer, "overdue warning sent");
        }
        if overdue.is_empty() {
            info!("no overdue payments");
        }
        Ok(OverdueSweepReport::from_count(overdue.len()))
    }

    /// Run on a fixed period until the task is dropped.
    ///
    /// Runs are sequential; a slow run delays the next tick instead of
    /// overlapping it. Each run gets its own [`TraceId`].
    pub async fn run_every(self, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = TraceId::fresh(self.run()).await {
                error!(error = %err, trace_id = ?err.trace_id(), "overdue sweep failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        DocumentStoreError, LiveEventKind, MockPaymentRepository, PaymentRepository as _,
    };
    use crate::domain::{DocumentId, PaymentRecord};
    use crate::test_support::{
        InMemoryNotifications, InMemoryPayments, MutableClock, RecordingPublisher,
    };
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;

    struct Harness {
        payments: Arc<InMemoryPayments>,
        notifications: Arc<InMemoryNotifications>,
        publisher: Arc<RecordingPublisher>,
        sweep: OverdueSweep,
    }

    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 3, 15, 0, 30, 0)
                .single()
                .expect("fixture time"),
        ))
    }

    fn harness() -> Harness {
        let payments = Arc::new(InMemoryPayments::default());
        let notifications = Arc::new(InMemoryNotifications::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let sweep = OverdueSweep::new(
            payments.clone(),
            NotificationService::new(notifications.clone(), publisher.clone()),
            clock(),
        );
        Harness {
            payments,
            notifications,
            publisher,
            sweep,
        }
    }

    async fn seed(payments: &InMemoryPayments, day: u32, status: PaymentStatus) {
        payments
            .insert(&PaymentRecord {
                customer: "Asha Verma".into(),
                customer_id: DocumentId::new("cust-1").expect("id"),
                amount: 750.0,
                date: NaiveDate::from_ymd_opt(2026, 3, day).expect("date"),
                status,
                created_at: Utc::now(),
            })
            .await
            .expect("seed");
    }

    #[tokio::test]
    async fn reports_nothing_overdue() {
        let h = harness();
        seed(&h.payments, 15, PaymentStatus::Pending).await;
        seed(&h.payments, 1, PaymentStatus::Paid).await;

        let report = h.sweep.run().await.expect("sweep");

        assert_eq!(
            serde_json::to_value(report).expect("json"),
            json!({"success": true, "message": "No overdue payments."})
        );
        assert!(h.publisher.events().is_empty());
    }

    #[tokio::test]
    async fn publishes_one_warning_per_overdue_payment_without_storing() {
        let h = harness();
        seed(&h.payments, 14, PaymentStatus::Pending).await;
        seed(&h.payments, 2, PaymentStatus::Pending).await;
        seed(&h.payments, 20, PaymentStatus::Pending).await;

        let report = h.sweep.run().await.expect("sweep");

        assert_eq!(
            serde_json::to_value(report).expect("json"),
            json!({"success": true, "count": 2})
        );
        let events = h.publisher.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind() == LiveEventKind::NewNotification));
        assert_eq!(events[0].payload()["type"], "PAYMENT_OVERDUE");
        assert_eq!(
            events[0].payload()["message"],
            "Payment of ₹750 from Asha Verma is overdue!"
        );
        assert_eq!(events[0].payload()["paymentId"], "pay-1");
        assert!(h.notifications.all().is_empty());
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let mut repo = MockPaymentRepository::new();
        repo.expect_list()
            .times(1)
            .return_once(|_| Err(DocumentStoreError::connection("timeout")));
        let sweep = OverdueSweep::new(
            Arc::new(repo),
            NotificationService::new(
                Arc::new(InMemoryNotifications::default()),
                Arc::new(RecordingPublisher::default()),
            ),
            clock(),
        );

        let error = sweep.run().await.expect_err("failure");
        assert_eq!(error.code(), crate::domain::ErrorCode::ServiceUnavailable);
    }
}
