//! Dues domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use society_shared::types::{BuildingId, FlatId, HousingUnitId, MemberId, SocietyId};

use super::error::DuesError;
use crate::period::MonthYear;

/// Category of a billable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Flat inside a building.
    Flat,
    /// Stand-alone housing unit.
    Housing,
}

/// Reference to exactly one billable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitRef {
    /// A flat and the building that owns it.
    Flat {
        /// Owning building.
        building_id: BuildingId,
        /// The flat.
        flat_id: FlatId,
    },
    /// A housing unit.
    Housing {
        /// The housing unit.
        housing_id: HousingUnitId,
    },
}

impl UnitRef {
    /// Builds a reference from the nullable column triple used in storage.
    ///
    /// # Errors
    ///
    /// Returns `DuesError::AmbiguousUnit` unless exactly one of `flat_id` and
    /// `housing_id` is set, and `DuesError::MissingBuilding` for a flat
    /// without a building.
    pub fn from_parts(
        building_id: Option<BuildingId>,
        flat_id: Option<FlatId>,
        housing_id: Option<HousingUnitId>,
    ) -> Result<Self, DuesError> {
        match (flat_id, housing_id) {
            (Some(flat_id), None) => building_id
                .map(|building_id| Self::Flat {
                    building_id,
                    flat_id,
                })
                .ok_or(DuesError::MissingBuilding),
            (None, Some(housing_id)) if building_id.is_none() => Ok(Self::Housing { housing_id }),
            _ => Err(DuesError::AmbiguousUnit),
        }
    }

    /// Splits the reference back into the nullable column triple.
    #[must_use]
    pub const fn into_parts(
        self,
    ) -> (Option<BuildingId>, Option<FlatId>, Option<HousingUnitId>) {
        match self {
            Self::Flat {
                building_id,
                flat_id,
            } => (Some(building_id), Some(flat_id), None),
            Self::Housing { housing_id } => (None, None, Some(housing_id)),
        }
    }

    /// Unit category.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        match self {
            Self::Flat { .. } => UnitKind::Flat,
            Self::Housing { .. } => UnitKind::Housing,
        }
    }
}

/// An occupied unit considered for dues generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupiedUnit {
    /// The unit.
    pub unit: UnitRef,
    /// Current monthly maintenance rate.
    pub current_maintenance: Decimal,
    /// Whether the unit is flagged occupied.
    pub is_occupied: bool,
    /// Members currently assigned.
    pub member_ids: Vec<MemberId>,
}

/// A due row ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueDraft {
    /// Owning society.
    pub society_id: SocietyId,
    /// Billed unit.
    pub unit: UnitRef,
    /// Members billed, never empty.
    pub member_ids: Vec<MemberId>,
    /// Billing month.
    pub month: MonthYear,
    /// Amount charged, copied from the unit's current rate.
    pub maintenance_amount: Decimal,
}

/// Outcome of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GenerationSummary {
    /// Due rows created for flats.
    pub flats_created: u64,
    /// Due rows created for housing units.
    pub housing_units_created: u64,
}

impl GenerationSummary {
    /// Total rows created.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.flats_created + self.housing_units_created
    }
}
