//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::DocumentStoreError;

/// Storage for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account.
    async fn insert(&self, user: &User) -> Result<(), DocumentStoreError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DocumentStoreError>;

    /// Fetch an account by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DocumentStoreError>;
}
