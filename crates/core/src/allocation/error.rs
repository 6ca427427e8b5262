//! Allocation error types.

use rust_decimal::Decimal;
use society_shared::AppError;
use thiserror::Error;

use crate::period::{MonthYear, PeriodError};

/// Errors raised while planning or validating allocations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Pending amount is zero, negative or fractional.
    #[error("Pending amount must be a positive whole amount, got {0}")]
    InvalidAmount(Decimal),

    /// A manual entry has a non-positive or fractional amount.
    #[error("Allocation for {month} must be a positive whole amount, got {amount}")]
    InvalidEntryAmount {
        /// Month of the offending entry.
        month: MonthYear,
        /// Offending amount.
        amount: Decimal,
    },

    /// Manual allocation does not cover the mode's month count.
    #[error("Expected {expected} monthly allocations, got {actual}")]
    WrongMonthCount {
        /// Months required by the mode.
        expected: u32,
        /// Months supplied.
        actual: usize,
    },

    /// The same month appears twice in a manual allocation.
    #[error("Month {0} appears more than once")]
    DuplicateMonth(MonthYear),

    /// Manual amounts do not add up to the pending amount.
    #[error("Allocations sum to {actual}, expected {expected}")]
    SumMismatch {
        /// Pending amount.
        expected: Decimal,
        /// Sum of supplied amounts.
        actual: Decimal,
    },

    /// Month arithmetic failed.
    #[error(transparent)]
    Period(#[from] PeriodError),
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::InvalidAmount(_)
            | AllocationError::InvalidEntryAmount { .. }
            | AllocationError::Period(_) => Self::Validation(err.to_string()),
            AllocationError::WrongMonthCount { .. }
            | AllocationError::DuplicateMonth(_)
            | AllocationError::SumMismatch { .. } => Self::BusinessRule(err.to_string()),
        }
    }
}
