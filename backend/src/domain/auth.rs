//! Account registration, login credentials, and session claims.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate raw inputs before a handler talks to a port or service.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::user::check_username;
use super::validation::{FieldViolation, ValidationErrors, email, length_between, required};
use super::UserId;

/// Minimum password length.
pub const PASSWORD_MIN: usize = 6;
/// Maximum password length.
pub const PASSWORD_MAX: usize = 50;

fn check_password(field: &'static str, value: String) -> Result<Zeroizing<String>, FieldViolation> {
    length_between(field, value, PASSWORD_MIN, PASSWORD_MAX).map(Zeroizing::new)
}

/// Untrusted registration payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    /// 3 to 20 letters, digits, or underscores.
    #[schema(example = "collections_admin")]
    pub username: Option<String>,
    /// Login email.
    #[schema(example = "admin@example.com")]
    pub email: Option<String>,
    /// 6 to 50 characters.
    #[schema(example = "s3cret!")]
    pub password: Option<String>,
    /// Must equal `password`.
    #[schema(example = "s3cret!")]
    pub confirm_password: Option<String>,
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: String,
    email: String,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate a registration payload, collecting every violation.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Registration, RegistrationInput};
    ///
    /// let mismatch = RegistrationInput {
    ///     username: Some("collections_admin".into()),
    ///     email: Some("admin@example.com".into()),
    ///     password: Some("s3cret!".into()),
    ///     confirm_password: Some("different".into()),
    /// };
    /// let errors = Registration::validate(mismatch).expect_err("mismatch");
    /// assert_eq!(errors.violations()[0].field(), "confirmPassword");
    /// ```
    pub fn validate(input: RegistrationInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let username = errors.check(required("username", input.username).and_then(check_username));
        let email = errors.check(required("email", input.email).and_then(|v| email("email", v)));
        let password = errors.check(
            required("password", input.password).and_then(|v| check_password("password", v)),
        );
        let confirm = errors.check(
            required("confirmPassword", input.confirm_password)
                .and_then(|v| check_password("confirmPassword", v)),
        );
        if let (Some(password), Some(confirm)) = (&password, &confirm) {
            if password != confirm {
                errors.push(FieldViolation::new(
                    "confirmPassword",
                    "custom",
                    "Passwords do not match",
                ));
            }
        }

        errors.finish(|| {
            Some(Self {
                username: username?,
                email: email?,
                password: password?,
            })
        })
    }

    /// Requested username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Requested login email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Plain-text password, zeroed on drop.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Untrusted login payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    /// Login email.
    #[schema(example = "admin@example.com")]
    pub email: Option<String>,
    /// Account password.
    #[schema(example = "s3cret!")]
    pub password: Option<String>,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is syntactically valid.
/// - `password` is 6 to 50 characters and keeps caller-provided whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate a login payload.
    pub fn validate(input: LoginInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let email = errors.check(required("email", input.email).and_then(|v| email("email", v)));
        let password = errors.check(
            required("password", input.password).and_then(|v| check_password("password", v)),
        );
        errors.finish(|| {
            Some(Self {
                email: email?,
                password: password?,
            })
        })
    }

    /// Login email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Plain-text password, zeroed on drop.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Authenticated account.
    pub user_id: UserId,
    /// Account email at issue time.
    pub email: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims valid from `issued_at` for `ttl`.
    ///
    /// Returns `None` when the expiry falls outside the representable range.
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(ttl)?;
        Some(Self {
            user_id,
            email: email.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Expiry as a timestamp, when representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// A signed session token together with its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded token.
    pub token: String,
    /// Seconds until expiry.
    pub max_age_secs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registration() -> RegistrationInput {
        RegistrationInput {
            username: Some("collections_admin".into()),
            email: Some("admin@example.com".into()),
            password: Some("s3cret!".into()),
            confirm_password: Some("s3cret!".into()),
        }
    }

    #[rstest]
    fn registration_accepts_matching_passwords(registration: RegistrationInput) {
        let valid = Registration::validate(registration).expect("valid");
        assert_eq!(valid.username(), "collections_admin");
        assert_eq!(valid.email(), "admin@example.com");
        assert_eq!(valid.password(), "s3cret!");
    }

    #[rstest]
    fn registration_reports_short_password_once_per_field(mut registration: RegistrationInput) {
        registration.password = Some("abc".into());
        registration.confirm_password = Some("abc".into());
        let errors = Registration::validate(registration).expect_err("short");
        let fields: Vec<_> = errors.violations().iter().map(FieldViolation::field).collect();
        assert_eq!(fields, ["password", "confirmPassword"]);
    }

    #[rstest]
    fn registration_rejects_mismatch(mut registration: RegistrationInput) {
        registration.confirm_password = Some("s3cret?".into());
        let errors = Registration::validate(registration).expect_err("mismatch");
        assert_eq!(errors.violations()[0].message(), "Passwords do not match");
    }

    #[rstest]
    #[case(None, Some("s3cret!"), "email")]
    #[case(Some("not-an-email"), Some("s3cret!"), "email")]
    #[case(Some("admin@example.com"), Some("12345"), "password")]
    fn login_rejects(
        #[case] email: Option<&str>,
        #[case] password: Option<&str>,
        #[case] field: &str,
    ) {
        let input = LoginInput {
            email: email.map(str::to_owned),
            password: password.map(str::to_owned),
        };
        let errors = LoginCredentials::validate(input).expect_err("invalid");
        assert_eq!(errors.violations()[0].field(), field);
    }

    #[test]
    fn claims_expire_after_ttl() {
        let issued = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).single().expect("time");
        let claims = SessionClaims::new(
            UserId::random(),
            "admin@example.com",
            issued,
            chrono::Duration::days(7),
        )
        .expect("claims");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert_eq!(
            claims.expires_at(),
            Utc.with_ymd_and_hms(2026, 3, 22, 12, 0, 0).single()
        );
    }

    #[test]
    fn claims_reject_unrepresentable_expiry() {
        let ttl = chrono::Duration::try_seconds(9_000_000_000_000).expect("ttl");
        let claims = SessionClaims::new(UserId::random(), "admin@example.com", Utc::now(), ttl);
        assert!(claims.is_none());
    }

    #[test]
    fn claims_use_camel_case_user_id() {
        let claims = SessionClaims::new(
            UserId::random(),
            "admin@example.com",
            Utc::now(),
            chrono::Duration::hours(1),
        )
        .expect("claims");
        let value = serde_json::to_value(&claims).expect("serialise");
        assert!(value.get("userId").is_some());
        assert!(value.get("exp").is_some());
    }
}
