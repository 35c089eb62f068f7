//! Account registration, login, and session verification.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, SessionTokenError, SessionTokens, UserRepository,
};
use crate::domain::{
    Error, IssuedToken, LoginCredentials, LoginInput, Registration, RegistrationInput,
    SessionClaims, User, UserId, UserProfile,
};

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn invalid_credentials() -> Error {
    Error::unauthorized(INVALID_CREDENTIALS)
}

fn user_not_found() -> Error {
    Error::not_found("User not found")
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

/// Issues and checks session tokens for dashboard users.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn SessionTokens>,
    clock: Arc<dyn Clock>,
    token_ttl: chrono::Duration,
}

impl AuthService {
    /// Create a service; tokens live for `token_ttl`.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn SessionTokens>,
        clock: Arc<dyn Clock>,
        token_ttl: chrono::Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
            token_ttl,
        }
    }

    /// Token lifetime.
    pub fn token_ttl(&self) -> chrono::Duration {
        self.token_ttl
    }

    /// Create an account. Emails are unique.
    pub async fn register(&self, input: RegistrationInput) -> Result<UserProfile, Error> {
        let registration = Registration::validate(input)?;
        if self
            .users
            .find_by_email(registration.email())
            .await?
            .is_some()
        {
            return Err(Error::conflict("Email is already registered"));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            username: registration.username().to_owned(),
            email: registration.email().to_owned(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(&user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user.into())
    }

    /// Check credentials and issue a signed session token.
    pub async fn login(&self, input: LoginInput) -> Result<IssuedToken, Error> {
        let credentials = LoginCredentials::validate(input)?;
        let user = self
            .users
            .find_by_email(credentials.email())
            .await?
            .ok_or_else(invalid_credentials)?;

        let matches = match self
            .hasher
            .verify(credentials.password(), &user.password_hash)
        {
            Ok(matches) => matches,
            Err(error) => {
                warn!(user_id = %user.id, %error, "stored password hash unusable");
                false
            }
        };
        if !matches {
            return Err(invalid_credentials());
        }

        let claims = SessionClaims::new(user.id, &user.email, self.clock.utc(), self.token_ttl)
            .ok_or_else(|| Error::internal("session expiry out of range"))?;
        let token = self.tokens.issue(&claims).map_err(|error| match error {
            SessionTokenError::Signing { message } | SessionTokenError::Invalid { message } => {
                Error::internal(format!("session token signing failed: {message}"))
            }
        })?;
        info!(user_id = %user.id, "user logged in");
        Ok(IssuedToken {
            token,
            max_age_secs: self.token_ttl.num_seconds(),
        })
    }

    /// Verify a presented token.
    pub fn authenticate(&self, token: &str) -> Result<SessionClaims, Error> {
        self.tokens.verify(token).map_err(|error| {
            warn!(%error, "session token rejected");
            Error::unauthorized("Unauthorized")
        })
    }

    /// Look up an account by identifier.
    pub async fn user_by_id(&self, id: &UserId) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(user_not_found)
    }

    /// Look up an account by email.
    pub async fn user_by_email(&self, email: &str) -> Result<UserProfile, Error> {
        self.users
            .find_by_email(email.trim())
            .await?
            .map(UserProfile::from)
            .ok_or_else(user_not_found)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
