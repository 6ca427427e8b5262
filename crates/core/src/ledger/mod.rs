//! Income and expense ledger entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use society_shared::AppError;
use society_shared::types::is_positive_whole_amount;
use thiserror::Error;

/// Which side of the ledger an entry sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    /// Money spent by the society.
    Expense,
    /// Money received outside maintenance dues.
    Income,
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Income => write!(f, "income"),
        }
    }
}

/// Errors raised while validating ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount is zero, negative or fractional.
    #[error("{kind} amount must be a positive whole amount, got {amount}")]
    InvalidAmount {
        /// Entry kind.
        kind: LedgerKind,
        /// Offending amount.
        amount: Decimal,
    },

    /// Entry type label is blank.
    #[error("{0} type is required")]
    TypeRequired(LedgerKind),

    /// Month is outside 1..=12.
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    /// Year is outside the supported range.
    #[error("Year {0} is out of range")]
    InvalidYear(i32),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// A validated ledger entry ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntryDraft {
    /// Expense or income.
    pub kind: LedgerKind,
    /// Category label, e.g. "electricity".
    pub entry_type: String,
    /// Free-text reason.
    pub reason: Option<String>,
    /// Amount in minor units.
    pub amount: Decimal,
    /// Month number, 1 through 12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

impl LedgerEntryDraft {
    /// Validates and normalizes a ledger entry.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` for a non-positive amount, blank type or an
    /// out-of-range month or year.
    pub fn new(
        kind: LedgerKind,
        entry_type: &str,
        reason: Option<&str>,
        amount: Decimal,
        month: u32,
        year: i32,
    ) -> Result<Self, LedgerError> {
        if !is_positive_whole_amount(amount) {
            return Err(LedgerError::InvalidAmount { kind, amount });
        }
        let entry_type = entry_type.trim();
        if entry_type.is_empty() {
            return Err(LedgerError::TypeRequired(kind));
        }
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidMonth(month));
        }
        if !(1900..=9999).contains(&year) {
            return Err(LedgerError::InvalidYear(year));
        }

        Ok(Self {
            kind,
            entry_type: entry_type.to_string(),
            reason: reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(ToString::to_string),
            amount,
            month,
            year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_expense() {
        let draft = LedgerEntryDraft::new(
            LedgerKind::Expense,
            " electricity ",
            Some("  "),
            dec!(20000),
            3,
            2024,
        )
        .unwrap();
        assert_eq!(draft.entry_type, "electricity");
        assert_eq!(draft.reason, None);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let err = LedgerEntryDraft::new(LedgerKind::Income, "hall", None, dec!(0), 3, 2024)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidAmount {
                kind: LedgerKind::Income,
                amount: dec!(0)
            }
        );
        assert!(err.to_string().starts_with("income amount"));
    }

    #[test]
    fn test_rejects_bad_month_year_and_type() {
        assert_eq!(
            LedgerEntryDraft::new(LedgerKind::Expense, "x", None, dec!(1), 13, 2024),
            Err(LedgerError::InvalidMonth(13))
        );
        assert_eq!(
            LedgerEntryDraft::new(LedgerKind::Expense, "x", None, dec!(1), 1, 12),
            Err(LedgerError::InvalidYear(12))
        );
        assert_eq!(
            LedgerEntryDraft::new(LedgerKind::Expense, "", None, dec!(1), 1, 2024),
            Err(LedgerError::TypeRequired(LedgerKind::Expense))
        );
    }

    #[test]
    fn test_maps_to_validation_error() {
        let err: AppError = LedgerError::InvalidMonth(0).into();
        assert_eq!(err.status_code(), 400);
    }
}
