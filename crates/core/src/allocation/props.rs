//! Property-based tests for allocation splitting.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{AllocationMode, AllocationPlanner};
use crate::period::MonthYear;

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(Decimal::from)
}

fn arb_spread_mode() -> impl Strategy<Value = AllocationMode> {
    prop_oneof![
        Just(AllocationMode::Quarterly),
        Just(AllocationMode::HalfYearly),
        Just(AllocationMode::Yearly),
    ]
}

fn arb_start() -> impl Strategy<Value = MonthYear> {
    (2000i32..2100i32, 1u32..=12u32).prop_map(|(y, m)| MonthYear::new(y, m).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Shares add up to the pending amount and only the last one carries
    /// the remainder.
    #[test]
    fn prop_split_sum_and_remainder(
        total in arb_amount(),
        mode in arb_spread_mode(),
        start in arb_start(),
    ) {
        let plan = AllocationPlanner::plan(total, mode, start).unwrap();
        let n = Decimal::from(mode.month_count());
        let base = (total / n).floor();
        let remainder = total - base * n;

        prop_assert_eq!(plan.len(), mode.month_count() as usize);
        prop_assert_eq!(plan.iter().map(|a| a.amount).sum::<Decimal>(), total);

        let (last, rest) = plan.split_last().unwrap();
        prop_assert_eq!(last.amount, base + remainder);
        prop_assert!(rest.iter().all(|a| a.amount == base));
    }

    /// Planned months are consecutive, distinct and start at `start`.
    #[test]
    fn prop_months_are_consecutive(
        total in arb_amount(),
        mode in arb_spread_mode(),
        start in arb_start(),
    ) {
        let plan = AllocationPlanner::plan(total, mode, start).unwrap();
        prop_assert_eq!(plan[0].month, start);
        for pair in plan.windows(2) {
            prop_assert_eq!(pair[0].month.plus_months(1).unwrap(), pair[1].month);
        }
    }

    /// Settlement always yields exactly one row carrying the whole amount.
    #[test]
    fn prop_settlement_single_row(total in arb_amount(), start in arb_start()) {
        let plan = AllocationPlanner::plan(total, AllocationMode::Settlement, start).unwrap();
        prop_assert_eq!(plan.len(), 1);
        prop_assert_eq!(plan[0].amount, total);
        prop_assert_eq!(plan[0].month, start);
    }

    /// A default plan always passes manual validation.
    #[test]
    fn prop_default_plan_is_valid_manual_input(
        total in (12i64..100_000_000i64).prop_map(Decimal::from),
        mode in arb_spread_mode(),
        start in arb_start(),
    ) {
        let plan = AllocationPlanner::plan(total, mode, start).unwrap();
        let validated = AllocationPlanner::validate_manual(total, mode, &plan).unwrap();
        prop_assert_eq!(validated, plan);
    }
}
