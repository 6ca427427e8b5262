//! Pure planning step of monthly dues generation.

use std::collections::HashSet;

use rust_decimal::Decimal;
use society_shared::types::SocietyId;

use super::error::DuesError;
use super::types::{DueDraft, OccupiedUnit, UnitRef};
use crate::period::MonthYear;

/// Plans which due rows a generation run must create.
pub struct DuesPlanner;

impl DuesPlanner {
    /// Returns one draft per occupied unit that has no due for `month` yet.
    ///
    /// Units flagged unoccupied or without members are skipped, as are units
    /// listed in `existing`. A unit appearing twice in `units` yields a single
    /// draft, so the result never contains two rows for one unit.
    #[must_use]
    pub fn plan(
        society_id: SocietyId,
        month: MonthYear,
        units: &[OccupiedUnit],
        existing: &HashSet<UnitRef>,
    ) -> Vec<DueDraft> {
        let mut seen: HashSet<UnitRef> = existing.clone();
        units
            .iter()
            .filter(|candidate| candidate.is_occupied && !candidate.member_ids.is_empty())
            .filter(|candidate| seen.insert(candidate.unit))
            .map(|candidate| {
                let mut member_ids = candidate.member_ids.clone();
                member_ids.sort_by_key(|id| id.into_inner());
                member_ids.dedup();
                DueDraft {
                    society_id,
                    unit: candidate.unit,
                    member_ids,
                    month,
                    maintenance_amount: candidate.current_maintenance,
                }
            })
            .collect()
    }
}

/// Checks a unit's maintenance rate.
///
/// # Errors
///
/// Returns `DuesError::InvalidRate` for negative or fractional amounts.
pub fn validate_maintenance_rate(rate: Decimal) -> Result<(), DuesError> {
    if rate < Decimal::ZERO || !rate.fract().is_zero() {
        return Err(DuesError::InvalidRate(rate));
    }
    Ok(())
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
