//! Splitting pending amounts into monthly allocations.

use std::collections::HashSet;

use rust_decimal::Decimal;
use society_shared::types::is_positive_whole_amount;

use super::error::AllocationError;
use super::types::{AllocationMode, PlannedAllocation};
use crate::period::MonthYear;

/// Plans allocation rows for a pending maintenance amount.
pub struct AllocationPlanner;

impl AllocationPlanner {
    /// Splits `total` into `count` shares.
    ///
    /// Every share is `floor(total / count)`; the last share also receives
    /// the remainder, so the shares always sum to `total`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidAmount` unless `total` is a positive
    /// whole amount, and `AllocationError::WrongMonthCount` for a zero count.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use society_core::allocation::AllocationPlanner;
    ///
    /// let shares = AllocationPlanner::split(dec!(10000), 3).unwrap();
    /// assert_eq!(shares, vec![dec!(3333), dec!(3333), dec!(3334)]);
    /// ```
    pub fn split(total: Decimal, count: u32) -> Result<Vec<Decimal>, AllocationError> {
        if !is_positive_whole_amount(total) {
            return Err(AllocationError::InvalidAmount(total));
        }
        if count == 0 {
            return Err(AllocationError::WrongMonthCount {
                expected: 1,
                actual: 0,
            });
        }

        let divisor = Decimal::from(count);
        let base = (total / divisor).floor();
        let remainder = total - base * divisor;

        let mut shares = vec![base; count as usize];
        if let Some(last) = shares.last_mut() {
            *last += remainder;
        }
        Ok(shares)
    }

    /// Plans `mode.month_count()` consecutive months starting at `start`.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::split`] errors and calendar overflow.
    pub fn plan(
        total: Decimal,
        mode: AllocationMode,
        start: MonthYear,
    ) -> Result<Vec<PlannedAllocation>, AllocationError> {
        let shares = Self::split(total, mode.month_count())?;
        let months = start.consecutive(mode.month_count())?;

        Ok(months
            .into_iter()
            .zip(shares)
            .map(|(month, amount)| PlannedAllocation { month, amount })
            .collect())
    }

    /// Validates a caller-supplied allocation and returns it ordered by month.
    ///
    /// # Errors
    ///
    /// Rejects the allocation unless it has exactly `mode.month_count()`
    /// distinct months, every amount is a positive whole amount, and the
    /// amounts add up to `total`.
    pub fn validate_manual(
        total: Decimal,
        mode: AllocationMode,
        entries: &[PlannedAllocation],
    ) -> Result<Vec<PlannedAllocation>, AllocationError> {
        if !is_positive_whole_amount(total) {
            return Err(AllocationError::InvalidAmount(total));
        }

        let expected = mode.month_count();
        if entries.len() != expected as usize {
            return Err(AllocationError::WrongMonthCount {
                expected,
                actual: entries.len(),
            });
        }

        let mut months = HashSet::with_capacity(entries.len());
        for entry in entries {
            if !is_positive_whole_amount(entry.amount) {
                return Err(AllocationError::InvalidEntryAmount {
                    month: entry.month,
                    amount: entry.amount,
                });
            }
            if !months.insert(entry.month) {
                return Err(AllocationError::DuplicateMonth(entry.month));
            }
        }

        let actual: Decimal = entries.iter().map(|e| e.amount).sum();
        if actual != total {
            return Err(AllocationError::SumMismatch {
                expected: total,
                actual,
            });
        }

        let mut ordered = entries.to_vec();
        ordered.sort_by_key(|e| e.month);
        Ok(ordered)
    }

    /// Plans either the caller's manual split or the default split.
    ///
    /// # Errors
    ///
    /// See [`Self::plan`] and [`Self::validate_manual`].
    pub fn plan_or_validate(
        total: Decimal,
        mode: AllocationMode,
        start: MonthYear,
        manual: Option<&[PlannedAllocation]>,
    ) -> Result<Vec<PlannedAllocation>, AllocationError> {
        match manual {
            Some(entries) => Self::validate_manual(total, mode, entries),
            None => Self::plan(total, mode, start),
        }
    }
}
