//! HTTP state wired to in-memory adapters.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{
    InMemoryCustomers, InMemoryNotifications, InMemoryPayments, InMemoryUsers, MutableClock,
    PlainTextHasher, RecordingPublisher,
};
use crate::domain::ports::{SessionTokens, UserRepository};
use crate::domain::{
    AuthService, CustomerService, DashboardService, NotificationService, OverdueSweep,
    PaymentService, SessionClaims, User, UserId,
};
use crate::inbound::http::state::{CookieSettings, HttpState, HttpStateServices};
use crate::outbound::security::JwtSessionTokens;

/// Signing secret used by harness-issued tokens.
pub const TEST_JWT_SECRET: &[u8] = b"harness-signing-secret";

/// Every in-memory adapter plus the [`HttpState`] built over them.
pub struct TestHarness {
    pub clock: Arc<MutableClock>,
    pub customers: Arc<InMemoryCustomers>,
    pub payments: Arc<InMemoryPayments>,
    pub notifications: Arc<InMemoryNotifications>,
    pub users: Arc<InMemoryUsers>,
    pub publisher: Arc<RecordingPublisher>,
    pub tokens: Arc<JwtSessionTokens>,
    pub state: HttpState,
}

/// Instant the harness clock starts at: 2026-03-15T10:00:00Z.
pub fn harness_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).single() {
        Some(now) => now,
        None => panic!("harness timestamp is valid"),
    }
}

impl TestHarness {
    /// Harness with the clock at [`harness_now`].
    pub fn new() -> Self {
        Self::at(harness_now())
    }

    /// Harness with the clock frozen at `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        let clock = Arc::new(MutableClock::new(now));
        let customers = Arc::new(InMemoryCustomers::default());
        let payments = Arc::new(InMemoryPayments::default());
        let notifications = Arc::new(InMemoryNotifications::default());
        let users = Arc::new(InMemoryUsers::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let tokens = Arc::new(JwtSessionTokens::new(TEST_JWT_SECRET, clock.clone()));

        let notification_service = NotificationService::new(notifications.clone(), publisher.clone());
        let services = HttpStateServices {
            auth: AuthService::new(
                users.clone(),
                Arc::new(PlainTextHasher),
                tokens.clone(),
                clock.clone(),
                Duration::days(7),
            ),
            customers: CustomerService::new(
                customers.clone(),
                notification_service.clone(),
                clock.clone(),
            ),
            payments: PaymentService::new(
                payments.clone(),
                notification_service.clone(),
                publisher.clone(),
                clock.clone(),
            ),
            dashboard: DashboardService::new(payments.clone(), clock.clone()),
            notifications: notification_service.clone(),
            sweep: OverdueSweep::new(payments.clone(), notification_service, clock.clone()),
        };
        let state = HttpState::new(services).with_cookie(CookieSettings { secure: false });

        Self {
            clock,
            customers,
            payments,
            notifications,
            users,
            publisher,
            tokens,
            state,
        }
    }

    /// Store a user directly and return a valid token for them.
    pub async fn sign_in(&self) -> String {
        let now = harness_now();
        let user = User {
            id: UserId::random(),
            username: "collections_admin".to_owned(),
            email: "admin@example.com".to_owned(),
            password_hash: "plain$s3cret!".to_owned(),
            created_at: now,
            updated_at: now,
        };
        if let Err(error) = self.users.insert(&user).await {
            panic!("harness user insert failed: {error}");
        }
        self.token_for(user.id, &user.email)
    }

    /// Token for an arbitrary identity, valid for a week from the harness clock.
    pub fn token_for(&self, user_id: UserId, email: &str) -> String {
        use mockable::Clock as _;

        let Some(claims) = SessionClaims::new(user_id, email, self.clock.utc(), Duration::days(7))
        else {
            panic!("harness expiry out of range");
        };
        match self.tokens.issue(&claims) {
            Ok(token) => token,
            Err(error) => panic!("harness token signing failed: {error}"),
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
