//! Tests for the authentication service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockSessionTokens;
use crate::test_support::{InMemoryUsers, MutableClock, PlainTextHasher};

struct Harness {
    users: Arc<InMemoryUsers>,
    service: AuthService,
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0)
        .single()
        .expect("fixture time")
}

fn with_tokens(tokens: MockSessionTokens) -> Harness {
    with_ttl(tokens, chrono::Duration::days(7))
}

fn with_ttl(tokens: MockSessionTokens, ttl: chrono::Duration) -> Harness {
    let users = Arc::new(InMemoryUsers::default());
    let service = AuthService::new(
        users.clone(),
        Arc::new(PlainTextHasher),
        Arc::new(tokens),
        Arc::new(MutableClock::new(now())),
        ttl,
    );
    Harness { users, service }
}

#[fixture]
fn harness() -> Harness {
    let mut tokens = MockSessionTokens::new();
    tokens
        .expect_issue()
        .returning(|claims| Ok(format!("token-for-{}", claims.email)));
    with_tokens(tokens)
}

fn registration(email: &str) -> RegistrationInput {
    RegistrationInput {
        username: Some("collections_admin".into()),
        email: Some(email.into()),
        password: Some("s3cret!".into()),
        confirm_password: Some("s3cret!".into()),
    }
}

fn login(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: Some(email.into()),
        password: Some(password.into()),
    }
}

#[rstest]
#[tokio::test]
async fn register_hashes_password_and_stamps_times(harness: Harness) {
    let profile = harness
        .service
        .register(registration("admin@example.com"))
        .await
        .expect("register");

    let stored = harness.users.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].password_hash, "plain$s3cret!");
    assert_eq!(stored[0].created_at, now());
    assert_eq!(profile.id, stored[0].id);
}

#[rstest]
#[tokio::test]
async fn register_rejects_duplicate_email(harness: Harness) {
    harness
        .service
        .register(registration("admin@example.com"))
        .await
        .expect("first");

    let error = harness
        .service
        .register(registration("admin@example.com"))
        .await
        .expect_err("duplicate");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn login_issues_token_with_ttl(harness: Harness) {
    harness
        .service
        .register(registration("admin@example.com"))
        .await
        .expect("register");

    let issued = harness
        .service
        .login(login("admin@example.com", "s3cret!"))
        .await
        .expect("login");

    assert_eq!(issued.token, "token-for-admin@example.com");
    assert_eq!(issued.max_age_secs, 7 * 24 * 60 * 60);
}

#[tokio::test]
async fn login_reports_unrepresentable_expiry_as_internal() {
    let ttl = chrono::Duration::try_seconds(9_000_000_000_000).expect("ttl");
    let harness = with_ttl(MockSessionTokens::new(), ttl);
    harness
        .service
        .register(registration("admin@example.com"))
        .await
        .expect("register");

    let error = harness
        .service
        .login(login("admin@example.com", "s3cret!"))
        .await
        .expect_err("expiry overflows");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[case::unknown_email("nobody@example.com", "s3cret!")]
#[case::wrong_password("admin@example.com", "wrong-password")]
#[tokio::test]
async fn login_failures_share_one_message(
    harness: Harness,
    #[case] email: &str,
    #[case] password: &str,
) {
    harness
        .service
        .register(registration("admin@example.com"))
        .await
        .expect("register");

    let error = harness
        .service
        .login(login(email, password))
        .await
        .expect_err("rejected");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[tokio::test]
async fn login_validates_before_lookup(harness: Harness) {
    let error = harness
        .service
        .login(login("admin@example.com", "123"))
        .await
        .expect_err("invalid");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[test]
fn authenticate_maps_rejections_to_unauthorized() {
    let mut tokens = MockSessionTokens::new();
    tokens
        .expect_verify()
        .times(1)
        .return_once(|_| Err(SessionTokenError::invalid("expired")));
    let harness = with_tokens(tokens);

    let error = harness
        .service
        .authenticate("stale")
        .expect_err("rejected");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "Unauthorized");
}

#[rstest]
#[tokio::test]
async fn lookups_hide_password_and_report_missing(harness: Harness) {
    let profile = harness
        .service
        .register(registration("admin@example.com"))
        .await
        .expect("register");

    let by_email = harness
        .service
        .user_by_email(" admin@example.com ")
        .await
        .expect("by email");
    assert_eq!(by_email, profile);
    let by_id = harness.service.user_by_id(&profile.id).await.expect("by id");
    assert_eq!(by_id.username, "collections_admin");

    let error = harness
        .service
        .user_by_id(&UserId::random())
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
