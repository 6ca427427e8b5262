//! One-way state transitions shared by dues, allocations and penalties.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a one-way transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// The row moved to the target state.
    Applied,
    /// The row was already in the target state; nothing changed.
    AlreadyApplied,
}

impl TransitionOutcome {
    /// True when the row had already been transitioned before this call.
    #[must_use]
    pub const fn was_already_applied(self) -> bool {
        matches!(self, Self::AlreadyApplied)
    }
}

/// Payment state of a billable row. Unpaid to paid only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PaymentState {
    /// Not yet paid.
    Unpaid,
    /// Paid at the given instant.
    Paid {
        /// When the payment was recorded.
        at: DateTime<Utc>,
    },
}

impl PaymentState {
    /// Builds the state from the stored flag and timestamp columns.
    ///
    /// A paid flag without a timestamp keeps `fallback` as the paid time.
    #[must_use]
    pub fn from_columns(
        is_paid: bool,
        paid_at: Option<DateTime<Utc>>,
        fallback: DateTime<Utc>,
    ) -> Self {
        if is_paid {
            Self::Paid {
                at: paid_at.unwrap_or(fallback),
            }
        } else {
            Self::Unpaid
        }
    }

    /// True if paid.
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self, Self::Paid { .. })
    }

    /// Paid timestamp, if any.
    #[must_use]
    pub const fn paid_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Paid { at } => Some(*at),
            Self::Unpaid => None,
        }
    }

    /// Moves to paid. Re-marking keeps the original timestamp.
    #[must_use]
    pub fn mark_paid(self, now: DateTime<Utc>) -> (Self, TransitionOutcome) {
        match self {
            Self::Unpaid => (Self::Paid { at: now }, TransitionOutcome::Applied),
            paid @ Self::Paid { .. } => (paid, TransitionOutcome::AlreadyApplied),
        }
    }
}
