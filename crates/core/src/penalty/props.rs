//! Property-based tests for penalty totals.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use society_shared::types::{HousingUnitId, PenaltyId, SocietyId, UserId};

use super::{DeletionState, Penalty, PenaltyLedger};
use crate::dues::UnitRef;
use crate::lifecycle::PaymentState;

fn arb_penalty() -> impl Strategy<Value = (i64, bool, bool)> {
    (1i64..1_000_000i64, any::<bool>(), any::<bool>())
}

fn build((amount, paid, deleted): (i64, bool, bool)) -> Penalty {
    let now = Utc::now();
    Penalty {
        id: PenaltyId::new(),
        society_id: SocietyId::new(),
        unit: UnitRef::Housing {
            housing_id: HousingUnitId::new(),
        },
        amount: Decimal::from(amount),
        reason: "Noise complaint".to_string(),
        payment: if paid {
            PaymentState::Paid { at: now }
        } else {
            PaymentState::Unpaid
        },
        deletion: if deleted {
            DeletionState::Deleted {
                at: now,
                by: UserId::new(),
            }
        } else {
            DeletionState::Active
        },
        action_by: UserId::new(),
        created_at: now,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Deleted penalties never contribute to the total, yet stay in the
    /// full listing and can still be found by id.
    #[test]
    fn prop_deleted_excluded_but_retrievable(specs in prop::collection::vec(arb_penalty(), 0..20)) {
        let penalties: Vec<Penalty> = specs.into_iter().map(build).collect();

        let expected: Decimal = penalties
            .iter()
            .filter(|p| !p.deletion.is_deleted())
            .map(|p| p.amount)
            .sum();
        prop_assert_eq!(PenaltyLedger::total_active(&penalties), expected);

        let listed = PenaltyLedger::visible(&penalties, true);
        prop_assert_eq!(listed.len(), penalties.len());
        for p in penalties.iter().filter(|p| p.deletion.is_deleted()) {
            prop_assert!(listed.iter().any(|l| l.id == p.id));
        }
    }

    /// Deleting one more active penalty lowers the total by its amount.
    #[test]
    fn prop_deleting_reduces_total(specs in prop::collection::vec(arb_penalty(), 1..20)) {
        let mut penalties: Vec<Penalty> = specs.into_iter().map(build).collect();
        let before = PenaltyLedger::total_active(&penalties);

        if let Some(target) = penalties.iter_mut().find(|p| !p.deletion.is_deleted()) {
            let amount = target.amount;
            target.mark_deleted(Utc::now(), UserId::new()).unwrap();
            prop_assert_eq!(PenaltyLedger::total_active(&penalties), before - amount);
        }
    }
}
