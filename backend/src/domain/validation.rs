//! Field-level validation shared by the customer, payment, and account inputs.
//!
//! Violations are collected rather than short-circuited so clients can
//! highlight every offending field from a single response.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde_json::json;

use super::Error;
use super::dates::parse_calendar_date;

/// Message returned for every schema validation failure.
pub const VALIDATION_FAILED: &str = "Validation failed";

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    field: &'static str,
    code: &'static str,
    message: String,
}

impl FieldViolation {
    /// Create a violation for `field`.
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    /// Name of the offending field as it appears on the wire.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Stable machine-readable violation code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Human-readable explanation.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Ordered set of violations gathered while validating one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    /// Start an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }

    /// Record `violation` when `result` is an error, returning the value otherwise.
    pub fn check<T>(&mut self, result: Result<T, FieldViolation>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.push(violation);
                None
            }
        }
    }

    /// Whether no violation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded violations, in field order.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Convert into `Ok(value)` when empty, otherwise into `Err(self)`.
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if !self.is_empty() {
            return Err(self);
        }
        value().ok_or(self)
    }
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Error::invalid_request(VALIDATION_FAILED).with_details(json!({ "errors": value.0 }))
    }
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(compile_email_regex);

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal exercised by the email validation tests"
)]
fn compile_email_regex() -> Regex {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
}

/// Require a value to be present.
pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T, FieldViolation> {
    value.ok_or_else(|| FieldViolation::new(field, "required", format!("{field} is required")))
}

/// Require a string to be non-empty once trimmed.
pub fn non_empty(field: &'static str, value: String) -> Result<String, FieldViolation> {
    if value.trim().is_empty() {
        return Err(FieldViolation::new(
            field,
            "too_small",
            format!("{field} must not be empty"),
        ));
    }
    Ok(value)
}

/// Require a string's character count to fall within `min..=max`.
pub fn length_between(
    field: &'static str,
    value: String,
    min: usize,
    max: usize,
) -> Result<String, FieldViolation> {
    let length = value.chars().count();
    if length < min {
        return Err(FieldViolation::new(
            field,
            "too_small",
            format!("{field} must contain at least {min} character(s)"),
        ));
    }
    if length > max {
        return Err(FieldViolation::new(
            field,
            "too_big",
            format!("{field} must contain at most {max} character(s)"),
        ));
    }
    Ok(value)
}

/// Require a syntactically valid email address.
pub fn email(field: &'static str, value: String) -> Result<String, FieldViolation> {
    if EMAIL_RE.is_match(value.trim()) {
        Ok(value.trim().to_owned())
    } else {
        Err(FieldViolation::new(field, "invalid_string", "Invalid email"))
    }
}

/// Require a finite amount within `min..=max`.
pub fn amount_between(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, FieldViolation> {
    if !value.is_finite() {
        return Err(FieldViolation::new(
            field,
            "invalid_type",
            format!("{field} must be a finite number"),
        ));
    }
    if value < min {
        return Err(FieldViolation::new(
            field,
            "too_small",
            format!("{field} must be greater than or equal to {min}"),
        ));
    }
    if value > max {
        return Err(FieldViolation::new(
            field,
            "too_big",
            format!("{field} must be less than or equal to {max}"),
        ));
    }
    Ok(value)
}

/// Require a parseable date that is not before `today`.
pub fn date_not_before(
    field: &'static str,
    raw: &str,
    today: NaiveDate,
) -> Result<NaiveDate, FieldViolation> {
    if raw.trim().is_empty() {
        return Err(FieldViolation::new(
            field,
            "too_small",
            format!("{field} must not be empty"),
        ));
    }
    let date = parse_calendar_date(raw).ok_or_else(|| {
        FieldViolation::new(field, "invalid_date", format!("{field} must be a valid date"))
    })?;
    if date < today {
        return Err(FieldViolation::new(
            field,
            "date_in_past",
            format!("{field} cannot be in the past"),
        ));
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date")
    }

    #[rstest]
    #[case("ops@example.com", true)]
    #[case("first.last+tag@sub.example.co", true)]
    #[case("missing-at.example.com", false)]
    #[case("no-tld@example", false)]
    #[case("spaces in@example.com", false)]
    fn email_shape(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(email("email", value.to_owned()).is_ok(), valid);
    }

    #[rstest]
    #[case("2026-03-15", true)]
    #[case("2026-03-16T00:00:00Z", true)]
    #[case("2026-03-14", false)]
    #[case("", false)]
    #[case("tomorrow", false)]
    fn date_window(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(date_not_before("date", raw, today()).is_ok(), valid);
    }

    #[test]
    fn past_dates_report_dedicated_code() {
        let violation = date_not_before("date", "2020-01-01", today()).expect_err("past");
        assert_eq!(violation.code(), "date_in_past");
        assert_eq!(violation.field(), "date");
    }

    #[rstest]
    #[case(-0.01, false)]
    #[case(0.0, true)]
    #[case(1_000_000.0, true)]
    #[case(1_000_000.5, false)]
    #[case(f64::NAN, false)]
    fn amount_bounds(#[case] value: f64, #[case] valid: bool) {
        assert_eq!(
            amount_between("amount", value, 0.0, 1_000_000.0).is_ok(),
            valid
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(length_between("name", "ñññ".to_owned(), 3, 3).is_ok());
        assert!(length_between("name", "ab".to_owned(), 3, 20).is_err());
    }

    #[test]
    fn errors_convert_to_invalid_request_with_details() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldViolation::new("email", "invalid_string", "Invalid email"));
        let error: Error = errors.into();

        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
        assert_eq!(error.message(), VALIDATION_FAILED);
        let details = error.details().expect("details");
        assert_eq!(details["errors"][0]["field"], "email");
        assert_eq!(details["errors"][0]["code"], "invalid_string");
    }

    #[test]
    fn finish_returns_value_when_clean() {
        let errors = ValidationErrors::new();
        assert_eq!(errors.finish(|| Some(7)), Ok(7));
    }
}
