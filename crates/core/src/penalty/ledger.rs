//! Penalty validation and aggregation.

use rust_decimal::Decimal;
use society_shared::types::is_positive_whole_amount;

use super::error::PenaltyError;
use super::types::Penalty;

/// Validates a new penalty's amount and reason.
///
/// # Errors
///
/// Returns `PenaltyError::InvalidAmount` or `PenaltyError::ReasonRequired`.
pub fn validate_new_penalty(amount: Decimal, reason: &str) -> Result<(), PenaltyError> {
    if !is_positive_whole_amount(amount) {
        return Err(PenaltyError::InvalidAmount(amount));
    }
    if reason.trim().is_empty() {
        return Err(PenaltyError::ReasonRequired);
    }
    Ok(())
}

/// Read-side helpers over a society's penalties.
pub struct PenaltyLedger;

impl PenaltyLedger {
    /// Sum of all non-deleted penalties, paid or unpaid.
    #[must_use]
    pub fn total_active(penalties: &[Penalty]) -> Decimal {
        penalties
            .iter()
            .filter(|p| !p.deletion.is_deleted())
            .map(|p| p.amount)
            .sum()
    }

    /// Sum of non-deleted penalties still awaiting payment.
    #[must_use]
    pub fn total_outstanding(penalties: &[Penalty]) -> Decimal {
        penalties
            .iter()
            .filter(|p| !p.deletion.is_deleted() && !p.payment.is_paid())
            .map(|p| p.amount)
            .sum()
    }

    /// Penalties visible in a listing.
    #[must_use]
    pub fn visible(penalties: &[Penalty], include_deleted: bool) -> Vec<&Penalty> {
        penalties
            .iter()
            .filter(|p| include_deleted || !p.deletion.is_deleted())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dues::UnitRef;
    use crate::lifecycle::{PaymentState, TransitionOutcome};
    use crate::penalty::DeletionState;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use society_shared::types::{HousingUnitId, PenaltyId, SocietyId, UserId};

    fn penalty(amount: Decimal) -> Penalty {
        Penalty {
            id: PenaltyId::new(),
            society_id: SocietyId::new(),
            unit: UnitRef::Housing {
                housing_id: HousingUnitId::new(),
            },
            amount,
            reason: "Late payment".to_string(),
            payment: PaymentState::Unpaid,
            deletion: DeletionState::Active,
            action_by: UserId::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_new_penalty() {
        assert!(validate_new_penalty(dec!(500), "Parking violation").is_ok());
        assert_eq!(
            validate_new_penalty(dec!(0), "x"),
            Err(PenaltyError::InvalidAmount(dec!(0)))
        );
        assert_eq!(
            validate_new_penalty(dec!(-5), "x"),
            Err(PenaltyError::InvalidAmount(dec!(-5)))
        );
        assert_eq!(
            validate_new_penalty(dec!(500), "   "),
            Err(PenaltyError::ReasonRequired)
        );
    }

    #[test]
    fn test_mark_paid_then_again() {
        let mut p = penalty(dec!(500));
        assert_eq!(p.mark_paid(Utc::now()), Ok(TransitionOutcome::Applied));
        assert_eq!(p.mark_paid(Utc::now()), Ok(TransitionOutcome::AlreadyApplied));
        assert!(p.payment.is_paid());
    }

    #[test]
    fn test_deleted_penalty_cannot_be_paid() {
        let mut p = penalty(dec!(500));
        p.mark_deleted(Utc::now(), UserId::new()).unwrap();
        assert_eq!(p.mark_paid(Utc::now()), Err(PenaltyError::Deleted));
        assert!(!p.payment.is_paid());
    }

    #[test]
    fn test_paid_penalty_can_be_deleted_once() {
        let mut p = penalty(dec!(500));
        p.mark_paid(Utc::now()).unwrap();
        let admin = UserId::new();
        assert!(p.mark_deleted(Utc::now(), admin).is_ok());
        assert!(matches!(p.deletion, DeletionState::Deleted { by, .. } if by == admin));
        assert_eq!(
            p.mark_deleted(Utc::now(), admin),
            Err(PenaltyError::AlreadyDeleted)
        );
    }

    #[test]
    fn test_totals_and_visibility() {
        let mut paid = penalty(dec!(1000));
        paid.mark_paid(Utc::now()).unwrap();
        let unpaid = penalty(dec!(500));
        let mut deleted = penalty(dec!(9999));
        deleted.mark_deleted(Utc::now(), UserId::new()).unwrap();

        let all = vec![paid, unpaid, deleted];
        assert_eq!(PenaltyLedger::total_active(&all), dec!(1500));
        assert_eq!(PenaltyLedger::total_outstanding(&all), dec!(500));
        assert_eq!(PenaltyLedger::visible(&all, false).len(), 2);
        assert_eq!(PenaltyLedger::visible(&all, true).len(), 3);
    }
}
