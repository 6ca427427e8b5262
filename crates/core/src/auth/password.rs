//! Argon2id password hashes stored as PHC strings.

use argon2::Argon2;
use argon2::password_hash::{
    Error as HashFailure, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    rand_core::OsRng,
};
use society_shared::AppError;
use thiserror::Error;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hashing and verification failures.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Under [`MIN_PASSWORD_LEN`] characters.
    #[error("password must be at least 8 characters")]
    TooShort,

    /// The stored hash could not be parsed.
    #[error("stored password hash is not a valid PHC string")]
    MalformedHash,

    /// Argon2 itself failed; the message is internal only.
    #[error("password hashing failed: {0}")]
    Argon(String),
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        if matches!(err, PasswordError::TooShort) {
            Self::Validation(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

/// Hashes `password` under a fresh random salt.
///
/// ```
/// let hash = society_core::auth::hash_password("correct horse").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Argon(e.to_string()))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on a wrong password; `Err` only when the stored hash or argon2 is broken.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let stored = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;
    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(HashFailure::Password) => Ok(false),
        Err(e) => Err(PasswordError::Argon(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_wrong_password() {
        let hash = hash_password("resident-password").unwrap();
        assert!(verify_password("resident-password", &hash).unwrap());
        assert!(!verify_password("resident-passwort", &hash).unwrap());
    }

    #[test]
    fn test_each_hash_gets_its_own_salt() {
        assert_ne!(
            hash_password("same-password").unwrap(),
            hash_password("same-password").unwrap()
        );
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(matches!(hash_password("1234567"), Err(PasswordError::TooShort)));
        assert!(hash_password("पासवर्डपास").is_ok());
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            verify_password("password", "not-a-phc-string"),
            Err(PasswordError::MalformedHash)
        ));
        assert!(matches!(AppError::from(PasswordError::TooShort), AppError::Validation(_)));
        assert!(matches!(
            AppError::from(PasswordError::MalformedHash),
            AppError::Internal(_)
        ));
    }
}
