//! Response envelopes shared by the dashboard handlers.
//!
//! Entities serialise flat (`{ id, ...fields }`); these wrappers add the
//! acknowledgement message or the key the dashboard reads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Customer, Notification, Payment, RecentPayment};

/// Bare acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    #[schema(example = "Customer deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    /// Wrap `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A customer with an acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerEnvelope {
    #[schema(example = "Customer retrieved successfully")]
    pub message: String,
    pub customer: Customer,
}

/// `GET /api/dashboard/customers/count` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCount {
    #[schema(example = 42)]
    pub total_customers: u64,
}

/// Customers stored by a spreadsheet upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BulkUploadResponse {
    #[schema(example = "Bulk upload successful")]
    pub message: String,
    pub data: Vec<Customer>,
}

/// Payment listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentList {
    pub payments: Vec<Payment>,
}

/// A payment with an acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentEnvelope {
    #[schema(example = "Payment status updated successfully")]
    pub message: String,
    pub payment: Payment,
}

/// Sum of pending amounts dated before today.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverdueAmount {
    #[schema(example = 4500.0)]
    pub overdue_amount: f64,
}

/// Sum of paid amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalCollected {
    #[schema(example = 12000.0)]
    pub total_collected: f64,
}

/// Paid share of all amounts, as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRate {
    #[schema(example = 72.73)]
    pub collection_rate: f64,
}

/// Newest payments, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecentPayments {
    pub payments: Vec<RecentPayment>,
}

/// Notification log listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
}

/// Number of unread notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    #[schema(example = 3)]
    pub unread_count: u64,
}

/// Acknowledgement of a read-flag change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    #[schema(example = "Notification marked as read")]
    pub message: String,
    pub notification_id: String,
}
