//! Payment records and their validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::dates::calendar_date;
use super::validation::{
    FieldViolation, ValidationErrors, amount_between, date_not_before, non_empty, required,
};
use super::DocumentId;

/// Largest amount accepted for a single payment.
pub const MAX_PAYMENT_AMOUNT: f64 = 1_000_000.0;

/// Collection state shared by payments and customer balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    /// Money has been collected.
    Paid,
    /// Money is still owed.
    Pending,
}

impl PaymentStatus {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
        }
    }

    /// Parse a wire value, reporting a violation against `field`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::PaymentStatus;
    ///
    /// assert_eq!(PaymentStatus::parse("status", "Paid"), Ok(PaymentStatus::Paid));
    /// assert!(PaymentStatus::parse("status", "paid").is_err());
    /// ```
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, FieldViolation> {
        match raw {
            "Paid" => Ok(Self::Paid),
            "Pending" => Ok(Self::Pending),
            _ => Err(FieldViolation::new(
                field,
                "invalid_enum_value",
                format!("Invalid enum value. Expected 'Paid' | 'Pending', received '{raw}'"),
            )),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored payment document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Display name of the paying customer.
    #[schema(example = "Asha Verma")]
    pub customer: String,
    /// Identifier of the paying customer.
    pub customer_id: DocumentId,
    /// Amount in rupees.
    #[schema(example = 1500.0)]
    pub amount: f64,
    /// Due or collection date.
    #[serde(with = "calendar_date")]
    #[schema(value_type = String, format = Date, example = "2026-11-01")]
    pub date: NaiveDate,
    /// Collection state.
    pub status: PaymentStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Payment with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Document body.
    #[serde(flatten)]
    pub record: PaymentRecord,
}

/// Untrusted payment fields as submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    /// Customer display name.
    pub customer: Option<String>,
    /// Customer identifier.
    pub customer_id: Option<String>,
    /// Amount between 0 and 1,000,000.
    pub amount: Option<f64>,
    /// `YYYY-MM-DD`, today or later.
    pub date: Option<String>,
    /// `Paid` or `Pending`.
    pub status: Option<String>,
}

/// Validated payment ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    customer: String,
    customer_id: DocumentId,
    amount: f64,
    date: NaiveDate,
    status: PaymentStatus,
}

impl NewPayment {
    /// Validate every field of `input`, collecting all violations.
    pub fn validate(input: PaymentInput, today: NaiveDate) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let customer = errors.check(
            required("customer", input.customer).and_then(|value| non_empty("customer", value)),
        );
        let customer_id = errors.check(required("customerId", input.customer_id).and_then(
            |value| {
                DocumentId::new(value).map_err(|_| {
                    FieldViolation::new("customerId", "too_small", "customerId must not be empty")
                })
            },
        ));
        let amount = errors.check(required("amount", input.amount).and_then(|value| {
            amount_between("amount", value, 0.0, MAX_PAYMENT_AMOUNT)
        }));
        let date = errors.check(
            required("date", input.date).and_then(|raw| date_not_before("date", &raw, today)),
        );
        let status = errors.check(
            required("status", input.status)
                .and_then(|raw| PaymentStatus::parse("status", &raw)),
        );

        errors.finish(|| {
            Some(Self {
                customer: customer?,
                customer_id: customer_id?,
                amount: amount?,
                date: date?,
                status: status?,
            })
        })
    }

    /// Stamp the creation time and produce the stored body.
    pub fn into_record(self, created_at: DateTime<Utc>) -> PaymentRecord {
        PaymentRecord {
            customer: self.customer,
            customer_id: self.customer_id,
            amount: self.amount,
            date: self.date,
            status: self.status,
            created_at,
        }
    }
}
