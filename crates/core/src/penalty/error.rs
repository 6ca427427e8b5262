//! Penalty error types.

use rust_decimal::Decimal;
use society_shared::AppError;
use thiserror::Error;

/// Errors raised by penalty transitions and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PenaltyError {
    /// Amount is zero, negative or fractional.
    #[error("Penalty amount must be a positive whole amount, got {0}")]
    InvalidAmount(Decimal),

    /// Reason is blank.
    #[error("Penalty reason is required")]
    ReasonRequired,

    /// Payment attempted on a deleted penalty.
    #[error("Penalty has been deleted and cannot be paid")]
    Deleted,

    /// Deletion attempted on an already deleted penalty.
    #[error("Penalty is already deleted")]
    AlreadyDeleted,
}

impl From<PenaltyError> for AppError {
    fn from(err: PenaltyError) -> Self {
        match err {
            PenaltyError::InvalidAmount(_) | PenaltyError::ReasonRequired => {
                Self::Validation(err.to_string())
            }
            PenaltyError::Deleted | PenaltyError::AlreadyDeleted => {
                Self::Conflict(err.to_string())
            }
        }
    }
}
