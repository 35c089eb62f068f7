//! User-facing notification log entries.
//!
//! Each customer or payment mutation produces one notification; the overdue
//! sweep produces unsaved ones that are only published.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::money::format_amount;
use super::{Customer, DocumentId, Payment, PaymentStatus};

/// Kind of event a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// A pending payment was recorded.
    PaymentCreated,
    /// A payment was recorded as, or moved to, paid.
    PaymentReceived,
    /// A payment status changed to something other than paid.
    PaymentUpdated,
    /// A pending payment passed its date.
    PaymentOverdue,
    /// A customer was added.
    NewCustomer,
}

/// Notification body, before or after storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Human-readable message.
    #[schema(example = "New customer Asha Verma added")]
    pub message: String,
    /// Related customer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<DocumentId>,
    /// Related payment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<DocumentId>,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Whether a user has acknowledged it.
    #[serde(default)]
    pub read: bool,
}

impl NotificationDraft {
    fn new(kind: NotificationType, message: String, at: DateTime<Utc>) -> Self {
        Self {
            kind,
            message,
            customer_id: None,
            payment_id: None,
            timestamp: at,
            read: false,
        }
    }

    fn for_payment(kind: NotificationType, message: String, payment: &Payment, at: DateTime<Utc>) -> Self {
        Self {
            payment_id: Some(payment.id.clone()),
            ..Self::new(kind, message, at)
        }
    }

    /// Announce a newly added customer.
    ///
    /// # Examples
    /// ```
    /// # use backend::domain::{Customer, CustomerRecord, DocumentId, NotificationDraft, NotificationType, PaymentStatus};
    /// # use chrono::{NaiveDate, Utc};
    /// # let customer = Customer {
    /// #     id: DocumentId::new("c-1").expect("id"),
    /// #     record: CustomerRecord {
    /// #         name: "Asha Verma".into(),
    /// #         phone_number: "9876543210".into(),
    /// #         email: "asha@example.com".into(),
    /// #         outstanding_payment: 0.0,
    /// #         payment_due_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("date"),
    /// #         payment_status: PaymentStatus::Paid,
    /// #         created_at: Utc::now(),
    /// #     },
    /// # };
    /// let draft = NotificationDraft::new_customer(&customer, Utc::now());
    /// assert_eq!(draft.kind, NotificationType::NewCustomer);
    /// assert_eq!(draft.message, "New customer Asha Verma added");
    /// ```
    pub fn new_customer(customer: &Customer, at: DateTime<Utc>) -> Self {
        Self {
            customer_id: Some(customer.id.clone()),
            ..Self::new(
                NotificationType::NewCustomer,
                format!("New customer {} added", customer.record.name),
                at,
            )
        }
    }

    /// Announce a newly recorded payment.
    pub fn payment_recorded(payment: &Payment, at: DateTime<Utc>) -> Self {
        let amount = format_amount(payment.record.amount);
        let customer = &payment.record.customer;
        match payment.record.status {
            PaymentStatus::Paid => Self::for_payment(
                NotificationType::PaymentReceived,
                format!("Payment of {amount} has been received from {customer}."),
                payment,
                at,
            ),
            PaymentStatus::Pending => Self::for_payment(
                NotificationType::PaymentCreated,
                format!("Payment of {amount} created from {customer}."),
                payment,
                at,
            ),
        }
    }

    /// Announce a payment status change.
    pub fn payment_status_changed(payment: &Payment, at: DateTime<Utc>) -> Self {
        let amount = format_amount(payment.record.amount);
        match payment.record.status {
            PaymentStatus::Paid => Self::for_payment(
                NotificationType::PaymentReceived,
                format!(
                    "Payment of {amount} has been received from {}.",
                    payment.record.customer
                ),
                payment,
                at,
            ),
            PaymentStatus::Pending => Self::for_payment(
                NotificationType::PaymentUpdated,
                format!(
                    "Payment status updated to {} for {amount}.",
                    payment.record.status
                ),
                payment,
                at,
            ),
        }
    }

    /// Warn that a pending payment is past its date.
    pub fn payment_overdue(payment: &Payment, at: DateTime<Utc>) -> Self {
        Self::for_payment(
            NotificationType::PaymentOverdue,
            format!(
                "Payment of {} from {} is overdue!",
                format_amount(payment.record.amount),
                payment.record.customer
            ),
            payment,
            at,
        )
    }
}

/// Stored notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Notification body.
    #[serde(flatten)]
    pub draft: NotificationDraft,
}
