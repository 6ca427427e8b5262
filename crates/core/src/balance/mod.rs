//! Final balance aggregation.
//!
//! `final_balance = opening_balance - expenses + maintenance_charged + penalties`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregated inputs of the final balance, each already summed per society.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceInputs {
    /// Society opening balance, may be negative.
    pub opening_balance: Decimal,
    /// Sum of expense rows.
    pub total_expenses: Decimal,
    /// Sum of `maintenance_amount` over all due rows.
    pub total_maintenance_charged: Decimal,
    /// Sum of non-deleted penalties.
    pub total_penalties: Decimal,
}

impl BalanceInputs {
    /// Computes the final balance.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use society_core::balance::BalanceInputs;
    ///
    /// let inputs = BalanceInputs {
    ///     opening_balance: dec!(100000),
    ///     total_expenses: dec!(20000),
    ///     total_maintenance_charged: dec!(10000),
    ///     total_penalties: dec!(1500),
    /// };
    /// assert_eq!(inputs.final_balance(), dec!(91500));
    /// ```
    #[must_use]
    pub fn final_balance(&self) -> Decimal {
        self.opening_balance - self.total_expenses
            + self.total_maintenance_charged
            + self.total_penalties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_scenario() {
        let inputs = BalanceInputs {
            opening_balance: dec!(100000),
            total_expenses: dec!(20000),
            total_maintenance_charged: dec!(10000),
            total_penalties: dec!(1500),
        };
        assert_eq!(inputs.final_balance(), dec!(91500));
    }

    #[test]
    fn test_empty_society_is_opening_balance() {
        let inputs = BalanceInputs {
            opening_balance: dec!(-2500),
            ..BalanceInputs::default()
        };
        assert_eq!(inputs.final_balance(), dec!(-2500));
    }

    fn arb_amount() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000_000i64).prop_map(Decimal::from)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_final_balance_formula(
            opening in (-10_000_000_000i64..10_000_000_000i64).prop_map(Decimal::from),
            expenses in arb_amount(),
            maintenance in arb_amount(),
            penalties in arb_amount(),
        ) {
            let inputs = BalanceInputs {
                opening_balance: opening,
                total_expenses: expenses,
                total_maintenance_charged: maintenance,
                total_penalties: penalties,
            };
            let first = inputs.final_balance();
            prop_assert_eq!(first, opening - expenses + maintenance + penalties);
            prop_assert_eq!(first, inputs.final_balance());
            prop_assert!(first.fract().is_zero());
        }
    }
}
