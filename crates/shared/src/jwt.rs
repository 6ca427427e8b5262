//! Access token issuing and verification.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;
use crate::config::JwtConfig;
use crate::error::AppError;

/// Token failures.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing failed or the expiry overflowed.
    #[error("failed to issue token: {0}")]
    Encode(String),

    /// Malformed, forged or signed with another secret.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Past its `exp`.
    #[error("token has expired")]
    Expired,
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::Unauthorized("Token has expired".to_string()),
            JwtError::Invalid(_) => Self::Unauthorized("Invalid or malformed token".to_string()),
            JwtError::Encode(_) => Self::Internal(err.to_string()),
        }
    }
}

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct JwtService {
    lifetime: Option<TimeDelta>,
    lifetime_secs: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Builds the service from the `jwt` config section.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            lifetime: i64::try_from(config.access_token_expiry_secs)
                .ok()
                .and_then(TimeDelta::try_seconds),
            lifetime_secs: config.access_token_expiry_secs,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
        }
    }

    /// Issues a token for a user, scoped to a society and role when given.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Encode` if the expiry overflows or signing fails.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        society: Option<(Uuid, &str)>,
    ) -> Result<String, JwtError> {
        let expires_at = self
            .lifetime
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| JwtError::Encode("token expiry out of range".to_string()))?;

        encode(
            &Header::default(),
            &Claims::new(user_id, society, expires_at),
            &self.encoding_key,
        )
        .map_err(|e| JwtError::Encode(e.to_string()))
    }

    /// Verifies the signature and expiry and returns the claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` or `JwtError::Invalid`.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }

    /// Token lifetime in seconds, as reported to clients.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> u64 {
        self.lifetime_secs
    }
}

#[cfg(test)]
#[path = "jwt_tests.rs"]
mod tests;
