//! Application-wide error types.
//!
//! Every layer converts its own error enum into `AppError` before it reaches
//! the HTTP boundary, so handlers only ever render one shape.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Failure categories shared by every crate.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, expired or invalid credentials.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Authenticated, but the society role is too low.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Unit, due, allocation, penalty, poll, option or notice is missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed month, non-positive amount, missing field.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Allocation sum mismatch, missing months and similar integrity rules.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Duplicate vote, duplicate allocation, penalty already deleted.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage unreachable or a query failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else the caller cannot fix.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn classify(&self) -> (u16, &'static str) {
        match self {
            Self::Unauthorized(_) => (401, "UNAUTHORIZED"),
            Self::Forbidden(_) => (403, "FORBIDDEN"),
            Self::NotFound(_) => (404, "NOT_FOUND"),
            Self::Validation(_) => (400, "VALIDATION_ERROR"),
            Self::BusinessRule(_) => (422, "BUSINESS_RULE_VIOLATION"),
            Self::Conflict(_) => (409, "CONFLICT"),
            Self::Database(_) => (500, "DATABASE_ERROR"),
            Self::Internal(_) => (500, "INTERNAL_ERROR"),
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.classify().0
    }

    /// Stable machine-readable code for the response body.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        self.classify().1
    }

    /// True for failures the caller cannot correct.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message safe to show to the caller.
    ///
    /// Storage and internal details never leave the process.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "An error occurred".to_string(),
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::BusinessRule(msg)
            | Self::Conflict(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
