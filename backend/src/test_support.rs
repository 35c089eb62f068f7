//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

mod clock;
mod harness;
mod memory_store;
mod publisher;
mod security;

pub use clock::MutableClock;
pub use harness::{TEST_JWT_SECRET, TestHarness, harness_now};
pub use memory_store::{
    InMemoryCustomers, InMemoryNotifications, InMemoryPayments, InMemoryUsers,
};
pub use publisher::RecordingPublisher;
pub use security::PlainTextHasher;
