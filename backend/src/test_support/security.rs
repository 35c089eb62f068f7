//! Fast password hasher for tests.

use crate::domain::ports::{PasswordHashError, PasswordHasher};

const PREFIX: &str = "plain$";

/// Stores passwords behind a marker prefix; never use outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("{PREFIX}{password}"))
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordHashError> {
        let expected = stored
            .strip_prefix(PREFIX)
            .ok_or_else(|| PasswordHashError::malformed_hash("missing plain$ prefix"))?;
        Ok(expected == password)
    }
}
