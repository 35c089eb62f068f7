//! Customer records, creation validation, and partial updates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::dates::calendar_date;
use super::validation::{
    FieldViolation, ValidationErrors, amount_between, date_not_before, email, length_between,
    non_empty, required,
};
use super::{DocumentId, PaymentStatus};

/// Minimum phone number length in characters.
pub const PHONE_MIN: usize = 10;
/// Maximum phone number length in characters.
pub const PHONE_MAX: usize = 15;

/// Stored customer document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    /// Full name.
    #[schema(example = "Asha Verma")]
    pub name: String,
    /// Contact number, 10 to 15 characters.
    #[schema(example = "9876543210")]
    pub phone_number: String,
    /// Contact email.
    #[schema(example = "asha@example.com")]
    pub email: String,
    /// Balance still owed.
    #[schema(example = 2500.0)]
    pub outstanding_payment: f64,
    /// Date the balance falls due.
    #[serde(with = "calendar_date")]
    #[schema(value_type = String, format = Date, example = "2026-11-01")]
    pub payment_due_date: NaiveDate,
    /// Whether the balance has been collected.
    pub payment_status: PaymentStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl CustomerRecord {
    /// Overwrite the fields present in `patch`.
    #[cfg(any(test, feature = "test-support"))]
    pub fn apply(&mut self, patch: &CustomerPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(phone_number) = &patch.phone_number {
            self.phone_number.clone_from(phone_number);
        }
        if let Some(email) = &patch.email {
            self.email.clone_from(email);
        }
        if let Some(outstanding_payment) = patch.outstanding_payment {
            self.outstanding_payment = outstanding_payment;
        }
        if let Some(payment_due_date) = patch.payment_due_date {
            self.payment_due_date = payment_due_date;
        }
        if let Some(payment_status) = patch.payment_status {
            self.payment_status = payment_status;
        }
    }
}

/// Customer with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Document body.
    #[serde(flatten)]
    pub record: CustomerRecord,
}

/// Untrusted customer fields as submitted by a client or a spreadsheet row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    /// Full name.
    pub name: Option<String>,
    /// Contact number.
    pub phone_number: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Balance owed, zero or more.
    pub outstanding_payment: Option<f64>,
    /// `YYYY-MM-DD`, today or later.
    pub payment_due_date: Option<String>,
    /// `Paid` or `Pending`.
    pub payment_status: Option<String>,
}

fn check_name(value: String) -> Result<String, FieldViolation> {
    non_empty("name", value)
}

fn check_phone(value: String) -> Result<String, FieldViolation> {
    length_between("phoneNumber", value, PHONE_MIN, PHONE_MAX)
}

fn check_email(value: String) -> Result<String, FieldViolation> {
    email("email", value)
}

fn check_outstanding(value: f64) -> Result<f64, FieldViolation> {
    amount_between("outstandingPayment", value, 0.0, f64::MAX)
}

fn check_due_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, FieldViolation> {
    date_not_before("paymentDueDate", raw, today)
}

fn check_status(raw: &str) -> Result<PaymentStatus, FieldViolation> {
    PaymentStatus::parse("paymentStatus", raw)
}

/// Validated customer ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    name: String,
    phone_number: String,
    email: String,
    outstanding_payment: f64,
    payment_due_date: NaiveDate,
    payment_status: PaymentStatus,
}

impl NewCustomer {
    /// Validate every field of `input`; all fields are required.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{CustomerInput, NewCustomer};
    /// use chrono::NaiveDate;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 1, 1).expect("date");
    /// let input = CustomerInput {
    ///     name: Some("Asha Verma".into()),
    ///     phone_number: Some("9876543210".into()),
    ///     email: Some("asha@example.com".into()),
    ///     outstanding_payment: Some(2500.0),
    ///     payment_due_date: Some("2026-02-01".into()),
    ///     payment_status: Some("Pending".into()),
    /// };
    /// assert!(NewCustomer::validate(input, today).is_ok());
    /// ```
    pub fn validate(input: CustomerInput, today: NaiveDate) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = errors.check(required("name", input.name).and_then(check_name));
        let phone_number =
            errors.check(required("phoneNumber", input.phone_number).and_then(check_phone));
        let email = errors.check(required("email", input.email).and_then(check_email));
        let outstanding_payment = errors.check(
            required("outstandingPayment", input.outstanding_payment).and_then(check_outstanding),
        );
        let payment_due_date = errors.check(
            required("paymentDueDate", input.payment_due_date)
                .and_then(|raw| check_due_date(&raw, today)),
        );
        let payment_status = errors.check(
            required("paymentStatus", input.payment_status).and_then(|raw| check_status(&raw)),
        );

        errors.finish(|| {
            Some(Self {
                name: name?,
                phone_number: phone_number?,
                email: email?,
                outstanding_payment: outstanding_payment?,
                payment_due_date: payment_due_date?,
                payment_status: payment_status?,
            })
        })
    }

    /// Customer name, used in notification messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stamp the creation time and produce the stored body.
    pub fn into_record(self, created_at: DateTime<Utc>) -> CustomerRecord {
        CustomerRecord {
            name: self.name,
            phone_number: self.phone_number,
            email: self.email,
            outstanding_payment: self.outstanding_payment,
            payment_due_date: self.payment_due_date,
            payment_status: self.payment_status,
            created_at,
        }
    }
}

/// Validated partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outstanding_payment: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_date"
    )]
    payment_due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_status: Option<PaymentStatus>,
}

fn serialize_optional_date<S: serde::Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => calendar_date::serialize(date, serializer),
        None => serializer.serialize_none(),
    }
}

impl CustomerPatch {
    /// Validate only the fields present in `input`.
    pub fn validate(input: CustomerInput, today: NaiveDate) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = input.name.map(check_name).and_then(|r| errors.check(r));
        let phone_number = input
            .phone_number
            .map(check_phone)
            .and_then(|r| errors.check(r));
        let email = input.email.map(check_email).and_then(|r| errors.check(r));
        let outstanding_payment = input
            .outstanding_payment
            .map(check_outstanding)
            .and_then(|r| errors.check(r));
        let payment_due_date = input
            .payment_due_date
            .map(|raw| check_due_date(&raw, today))
            .and_then(|r| errors.check(r));
        let payment_status = input
            .payment_status
            .map(|raw| check_status(&raw))
            .and_then(|r| errors.check(r));

        errors.finish(|| {
            Some(Self {
                name,
                phone_number,
                email,
                outstanding_payment,
                payment_due_date,
                payment_status,
            })
        })
    }
}
