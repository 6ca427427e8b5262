//! Society notices.

use chrono::{DateTime, Utc};
use society_shared::AppError;
use thiserror::Error;

/// Maximum notice title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Errors raised while validating notices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoticeError {
    /// Title is blank or too long.
    #[error("Notice title must be 1 to 200 characters")]
    InvalidTitle,

    /// Body is blank.
    #[error("Notice body is required")]
    BodyRequired,

    /// Expiry is not in the future.
    #[error("Notice expiry must be in the future")]
    ExpiryInPast,
}

impl From<NoticeError> for AppError {
    fn from(err: NoticeError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Validates a new notice and returns its trimmed title and body.
///
/// # Errors
///
/// Returns a `NoticeError` for a blank or oversized title, a blank body or
/// an expiry that is not after `now`.
pub fn validate_notice(
    title: &str,
    body: &str,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(String, String), NoticeError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(NoticeError::InvalidTitle);
    }
    let body = body.trim();
    if body.is_empty() {
        return Err(NoticeError::BodyRequired);
    }
    if expires_at.is_some_and(|at| at <= now) {
        return Err(NoticeError::ExpiryInPast);
    }
    Ok((title.to_string(), body.to_string()))
}

/// True while a notice should be shown.
#[must_use]
pub fn is_active(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_none_or(|at| now < at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_notice() {
        let now = Utc::now();
        let (title, body) =
            validate_notice(" Water cut ", " Tuesday 10-12 ", None, now).unwrap();
        assert_eq!(title, "Water cut");
        assert_eq!(body, "Tuesday 10-12");

        assert_eq!(
            validate_notice("", "body", None, now),
            Err(NoticeError::InvalidTitle)
        );
        assert_eq!(
            validate_notice(&"x".repeat(MAX_TITLE_LEN + 1), "body", None, now),
            Err(NoticeError::InvalidTitle)
        );
        assert_eq!(
            validate_notice("t", " ", None, now),
            Err(NoticeError::BodyRequired)
        );
        assert_eq!(
            validate_notice("t", "b", Some(now - Duration::minutes(1)), now),
            Err(NoticeError::ExpiryInPast)
        );
    }

    #[test]
    fn test_is_active() {
        let now = Utc::now();
        assert!(is_active(None, now));
        assert!(is_active(Some(now + Duration::hours(1)), now));
        assert!(!is_active(Some(now), now));
    }
}
