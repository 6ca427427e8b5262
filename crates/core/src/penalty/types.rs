//! Penalty domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use society_shared::types::{PenaltyId, SocietyId, UserId};

use super::error::PenaltyError;
use crate::dues::UnitRef;
use crate::lifecycle::{PaymentState, TransitionOutcome};

/// Soft-delete state of a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeletionState {
    /// Visible and counted.
    Active,
    /// Hidden from totals.
    Deleted {
        /// When it was deleted.
        at: DateTime<Utc>,
        /// Who deleted it.
        by: UserId,
    },
}

impl DeletionState {
    /// True if soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }
}

/// A penalty charged against a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Penalty {
    /// Penalty id.
    pub id: PenaltyId,
    /// Owning society.
    pub society_id: SocietyId,
    /// Charged unit.
    pub unit: UnitRef,
    /// Amount in minor units.
    pub amount: Decimal,
    /// Why it was charged.
    pub reason: String,
    /// Payment state.
    pub payment: PaymentState,
    /// Soft-delete state.
    pub deletion: DeletionState,
    /// User who created it.
    pub action_by: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Penalty {
    /// Marks the penalty paid.
    ///
    /// # Errors
    ///
    /// Returns `PenaltyError::Deleted` if the penalty is soft-deleted.
    pub fn mark_paid(&mut self, now: DateTime<Utc>) -> Result<TransitionOutcome, PenaltyError> {
        if self.deletion.is_deleted() {
            return Err(PenaltyError::Deleted);
        }
        let (payment, outcome) = self.payment.mark_paid(now);
        self.payment = payment;
        Ok(outcome)
    }

    /// Soft-deletes the penalty, whether or not it has been paid.
    ///
    /// # Errors
    ///
    /// Returns `PenaltyError::AlreadyDeleted` on a second deletion.
    pub fn mark_deleted(&mut self, now: DateTime<Utc>, by: UserId) -> Result<(), PenaltyError> {
        if self.deletion.is_deleted() {
            return Err(PenaltyError::AlreadyDeleted);
        }
        self.deletion = DeletionState::Deleted { at: now, by };
        Ok(())
    }
}
