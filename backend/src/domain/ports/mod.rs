//! Driven ports for the hexagonal boundary.
//!
//! Adapters under `outbound` implement these traits; services depend only on
//! the traits so tests can substitute mocks or in-memory doubles.

mod macros;
pub(crate) use macros::define_port_error;

mod customer_repository;
mod event_publisher;
mod notification_repository;
mod password_hasher;
mod payment_repository;
mod session_tokens;
mod store_error;
mod user_repository;

pub use customer_repository::CustomerRepository;
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use event_publisher::{
    DASHBOARD_CHANNEL, EventPublisher, EventPublisherError, LiveEvent, LiveEventFrame,
    LiveEventKind, NOTIFICATIONS_CHANNEL,
};
#[cfg(test)]
pub use event_publisher::MockEventPublisher;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::NotificationRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentQuery, PaymentRepository};
#[cfg(test)]
pub use session_tokens::MockSessionTokens;
pub use session_tokens::{SessionTokenError, SessionTokens};
pub use store_error::DocumentStoreError;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
