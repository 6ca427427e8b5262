//! Building, flat and housing unit repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use society_core::dues::{DuesError, validate_maintenance_rate};
use society_shared::AppError;
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::{buildings, flats, housing_units};

/// Error types for unit operations.
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    /// Building not found in the society.
    #[error("Building not found: {0}")]
    BuildingNotFound(Uuid),

    /// Flat not found in the society.
    #[error("Flat not found: {0}")]
    FlatNotFound(Uuid),

    /// Housing unit not found in the society.
    #[error("Housing unit not found: {0}")]
    HousingUnitNotFound(Uuid),

    /// A unit or building with this name already exists.
    #[error("Unit already exists: {0}")]
    Duplicate(String),

    /// Invalid maintenance rate.
    #[error(transparent)]
    Rate(#[from] DuesError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UnitError> for AppError {
    fn from(err: UnitError) -> Self {
        match err {
            UnitError::BuildingNotFound(_)
            | UnitError::FlatNotFound(_)
            | UnitError::HousingUnitNotFound(_) => Self::NotFound(err.to_string()),
            UnitError::Duplicate(_) => Self::Conflict(err.to_string()),
            UnitError::Rate(e) => e.into(),
            UnitError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a building.
#[derive(Debug, Clone)]
pub struct CreateBuildingInput {
    /// Building name.
    pub name: String,
    /// Number of floors.
    pub total_floors: i32,
}

/// Input for creating a flat.
#[derive(Debug, Clone)]
pub struct CreateFlatInput {
    /// Owning building.
    pub building_id: Uuid,
    /// Flat number, unique within the building.
    pub flat_number: String,
    /// Floor.
    pub floor_number: i32,
    /// Area.
    pub square_foot: i32,
    /// Monthly maintenance rate in minor units.
    pub current_maintenance: Decimal,
}

/// Input for creating a housing unit.
#[derive(Debug, Clone)]
pub struct CreateHousingUnitInput {
    /// Unit number, unique within the society.
    pub unit_number: String,
    /// Free-form unit type (villa, row house, shop).
    pub unit_type: String,
    /// Area.
    pub square_foot: i32,
    /// Monthly maintenance rate in minor units.
    pub current_maintenance: Decimal,
}

/// Repository for the units dues are charged against.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    db: DatabaseConnection,
}

impl UnitRepository {
    /// Creates a new unit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a building.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_building(
        &self,
        society_id: Uuid,
        input: CreateBuildingInput,
    ) -> Result<buildings::Model, UnitError> {
        let now = chrono::Utc::now().into();
        let name = input.name;
        buildings::ActiveModel {
            id: Set(Uuid::now_v7()),
            society_id: Set(society_id),
            name: Set(name.clone()),
            total_floors: Set(input.total_floors),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                UnitError::Duplicate(name)
            } else {
                UnitError::Database(e)
            }
        })
    }

    /// Lists a society's buildings by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_buildings(&self, society_id: Uuid) -> Result<Vec<buildings::Model>, DbErr> {
        buildings::Entity::find()
            .filter(buildings::Column::SocietyId.eq(society_id))
            .order_by_asc(buildings::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a building in a society.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_building(
        &self,
        society_id: Uuid,
        building_id: Uuid,
    ) -> Result<Option<buildings::Model>, DbErr> {
        buildings::Entity::find_by_id(building_id)
            .filter(buildings::Column::SocietyId.eq(society_id))
            .one(&self.db)
            .await
    }

    /// Creates a flat. New flats start unoccupied.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::BuildingNotFound` if the building is not in the
    /// society, or `UnitError::Rate` for an invalid rate.
    pub async fn create_flat(
        &self,
        society_id: Uuid,
        input: CreateFlatInput,
    ) -> Result<flats::Model, UnitError> {
        validate_maintenance_rate(input.current_maintenance)?;
        if self
            .find_building(society_id, input.building_id)
            .await?
            .is_none()
        {
            return Err(UnitError::BuildingNotFound(input.building_id));
        }

        let now = chrono::Utc::now().into();
        let number = input.flat_number;
        flats::ActiveModel {
            id: Set(Uuid::now_v7()),
            society_id: Set(society_id),
            building_id: Set(input.building_id),
            flat_number: Set(number.clone()),
            floor_number: Set(input.floor_number),
            square_foot: Set(input.square_foot),
            current_maintenance: Set(input.current_maintenance),
            is_occupied: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                UnitError::Duplicate(number)
            } else {
                UnitError::Database(e)
            }
        })
    }

    /// Lists flats, optionally limited to one building.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_flats(
        &self,
        society_id: Uuid,
        building_id: Option<Uuid>,
    ) -> Result<Vec<flats::Model>, DbErr> {
        let mut query = flats::Entity::find().filter(flats::Column::SocietyId.eq(society_id));
        if let Some(building_id) = building_id {
            query = query.filter(flats::Column::BuildingId.eq(building_id));
        }
        query
            .order_by_asc(flats::Column::BuildingId)
            .order_by_asc(flats::Column::FlatNumber)
            .all(&self.db)
            .await
    }

    /// Finds a flat in a society.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_flat(
        &self,
        society_id: Uuid,
        flat_id: Uuid,
    ) -> Result<Option<flats::Model>, DbErr> {
        flats::Entity::find_by_id(flat_id)
            .filter(flats::Column::SocietyId.eq(society_id))
            .one(&self.db)
            .await
    }

    /// Changes a flat's maintenance rate. Existing dues keep their amount.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::FlatNotFound` or `UnitError::Rate`.
    pub async fn update_flat_rate(
        &self,
        society_id: Uuid,
        flat_id: Uuid,
        rate: Decimal,
    ) -> Result<flats::Model, UnitError> {
        validate_maintenance_rate(rate)?;
        let flat = self
            .find_flat(society_id, flat_id)
            .await?
            .ok_or(UnitError::FlatNotFound(flat_id))?;

        let mut active: flats::ActiveModel = flat.into();
        active.current_maintenance = Set(rate);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Creates a housing unit. New units start unoccupied.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::Rate` for an invalid rate or
    /// `UnitError::Duplicate` for a reused unit number.
    pub async fn create_housing_unit(
        &self,
        society_id: Uuid,
        input: CreateHousingUnitInput,
    ) -> Result<housing_units::Model, UnitError> {
        validate_maintenance_rate(input.current_maintenance)?;

        let now = chrono::Utc::now().into();
        let number = input.unit_number;
        housing_units::ActiveModel {
            id: Set(Uuid::now_v7()),
            society_id: Set(society_id),
            unit_number: Set(number.clone()),
            unit_type: Set(input.unit_type),
            square_foot: Set(input.square_foot),
            current_maintenance: Set(input.current_maintenance),
            is_occupied: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                UnitError::Duplicate(number)
            } else {
                UnitError::Database(e)
            }
        })
    }

    /// Lists a society's housing units by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_housing_units(
        &self,
        society_id: Uuid,
    ) -> Result<Vec<housing_units::Model>, DbErr> {
        housing_units::Entity::find()
            .filter(housing_units::Column::SocietyId.eq(society_id))
            .order_by_asc(housing_units::Column::UnitNumber)
            .all(&self.db)
            .await
    }

    /// Finds a housing unit in a society.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_housing_unit(
        &self,
        society_id: Uuid,
        housing_id: Uuid,
    ) -> Result<Option<housing_units::Model>, DbErr> {
        housing_units::Entity::find_by_id(housing_id)
            .filter(housing_units::Column::SocietyId.eq(society_id))
            .one(&self.db)
            .await
    }

    /// Changes a housing unit's maintenance rate.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::HousingUnitNotFound` or `UnitError::Rate`.
    pub async fn update_housing_rate(
        &self,
        society_id: Uuid,
        housing_id: Uuid,
        rate: Decimal,
    ) -> Result<housing_units::Model, UnitError> {
        validate_maintenance_rate(rate)?;
        let unit = self
            .find_housing_unit(society_id, housing_id)
            .await?
            .ok_or(UnitError::HousingUnitNotFound(housing_id))?;

        let mut active: housing_units::ActiveModel = unit.into();
        active.current_maintenance = Set(rate);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }
}
