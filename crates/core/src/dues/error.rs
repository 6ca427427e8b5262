//! Dues error types.

use rust_decimal::Decimal;
use society_shared::AppError;
use thiserror::Error;

/// Errors raised by dues planning and unit validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuesError {
    /// Neither or both of the flat and housing-unit references were given.
    #[error("Exactly one of flat or housing unit must be set")]
    AmbiguousUnit,

    /// A flat reference is missing its building.
    #[error("Flat reference requires a building")]
    MissingBuilding,

    /// Maintenance rate is negative or fractional.
    #[error("Maintenance rate must be a non-negative whole amount, got {0}")]
    InvalidRate(Decimal),
}

impl From<DuesError> for AppError {
    fn from(err: DuesError) -> Self {
        Self::Validation(err.to_string())
    }
}
