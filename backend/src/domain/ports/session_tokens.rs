//! Port for signing and checking session tokens.

use crate::domain::SessionClaims;

use super::define_port_error;

define_port_error! {
    /// Errors raised by session token codecs.
    pub enum SessionTokenError {
        /// The token is malformed, tampered with, or expired.
        Invalid { message: String } => "session token rejected: {message}",
        /// The token could not be signed.
        Signing { message: String } => "session token signing failed: {message}",
    }
}

/// Issues and verifies signed session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokens: Send + Sync {
    /// Sign `claims`.
    fn issue(&self, claims: &SessionClaims) -> Result<String, SessionTokenError>;

    /// Check signature and expiry, returning the claims.
    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError>;
}
