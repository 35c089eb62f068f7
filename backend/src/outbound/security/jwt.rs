//! HS256 session tokens.
//!
//! Expiry is checked against the injected clock rather than inside
//! `jsonwebtoken`, so the codec and the services that issue claims agree on
//! what "now" is.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;

use crate::domain::SessionClaims;
use crate::domain::ports::{SessionTokenError, SessionTokens};

/// [`SessionTokens`] backed by HMAC-SHA256 signed JWTs.
#[derive(Clone)]
pub struct JwtSessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtSessionTokens {
    /// Codec signing with `secret`.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }
}

impl SessionTokens for JwtSessionTokens {
    fn issue(&self, claims: &SessionClaims) -> Result<String, SessionTokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|error| SessionTokenError::signing(error.to_string()))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        let claims = decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|error| SessionTokenError::invalid(error.to_string()))?;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(SessionTokenError::invalid("token expired"));
        }
        Ok(claims)
    }
}
