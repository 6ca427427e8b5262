//! Member repository: assigning users to flats and housing units.
//!
//! Assignment and unassignment keep the unit's `is_occupied` flag in step
//! with its active members inside one tenant transaction.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use society_core::dues::UnitRef;
use society_shared::AppError;
use society_shared::types::{BuildingId, FlatId, HousingUnitId};
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::{
    flats, housing_units, members, sea_orm_active_enums::SocietyRole, society_users, users,
};
use crate::rls::SocietyScoped;

/// Error types for member operations.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Flat or housing unit not found in the society.
    #[error("Unit not found")]
    UnitNotFound,

    /// Member not found or already moved out.
    #[error("Member not found: {0}")]
    NotFound(Uuid),

    /// User already occupies a unit in this society.
    #[error("User is already assigned to a unit in this society")]
    AlreadyAssigned,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<MemberError> for AppError {
    fn from(err: MemberError) -> Self {
        match err {
            MemberError::UserNotFound(_) | MemberError::UnitNotFound | MemberError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            MemberError::AlreadyAssigned => Self::Conflict(err.to_string()),
            MemberError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for assigning a user to a unit.
#[derive(Debug, Clone)]
pub struct AssignMemberInput {
    /// User being assigned.
    pub user_id: Uuid,
    /// Target unit.
    pub unit: UnitRef,
    /// Move-in date.
    pub move_in_date: NaiveDate,
}

/// Member repository.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: DatabaseConnection,
}

impl MemberRepository {
    /// Creates a new member repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assigns a user to a unit and marks the unit occupied.
    ///
    /// Users without a role in the society are granted `member`.
    ///
    /// # Errors
    ///
    /// Returns `MemberError::UnitNotFound` for a unit outside the society and
    /// `MemberError::AlreadyAssigned` if the user already has an active unit.
    pub async fn assign(
        &self,
        society_id: Uuid,
        input: AssignMemberInput,
    ) -> Result<members::Model, MemberError> {
        if users::Entity::find_by_id(input.user_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(MemberError::UserNotFound(input.user_id));
        }

        let rls = self.db.with_rls(society_id).await?;
        let txn = rls.transaction();
        let (building_id, flat_id, housing_id) = unit_columns(input.unit);

        set_occupied(txn, society_id, input.unit, true).await?;

        let now = chrono::Utc::now().into();
        let member = members::ActiveModel {
            id: Set(Uuid::now_v7()),
            society_id: Set(society_id),
            user_id: Set(input.user_id),
            building_id: Set(building_id),
            flat_id: Set(flat_id),
            housing_id: Set(housing_id),
            move_in_date: Set(input.move_in_date),
            moved_out_at: Set(None),
            created_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                MemberError::AlreadyAssigned
            } else {
                MemberError::Database(e)
            }
        })?;

        let has_role = society_users::Entity::find_by_id((society_id, input.user_id))
            .one(txn)
            .await?
            .is_some();
        if !has_role {
            society_users::ActiveModel {
                society_id: Set(society_id),
                user_id: Set(input.user_id),
                role: Set(SocietyRole::Member),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(txn)
            .await?;
        }

        rls.commit().await?;
        tracing::info!(
            society_id = %society_id,
            member_id = %member.id,
            user_id = %input.user_id,
            "Member assigned"
        );
        Ok(member)
    }

    /// Moves a member out. The unit is marked vacant once its last active
    /// member leaves.
    ///
    /// # Errors
    ///
    /// Returns `MemberError::NotFound` if the member is unknown or has
    /// already moved out.
    pub async fn unassign(
        &self,
        society_id: Uuid,
        member_id: Uuid,
    ) -> Result<members::Model, MemberError> {
        let rls = self.db.with_rls(society_id).await?;
        let txn = rls.transaction();

        let member = members::Entity::find_by_id(member_id)
            .filter(members::Column::SocietyId.eq(society_id))
            .filter(members::Column::MovedOutAt.is_null())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(MemberError::NotFound(member_id))?;

        let unit = UnitRef::from_parts(
            member.building_id.map(BuildingId::from_uuid),
            member.flat_id.map(FlatId::from_uuid),
            member.housing_id.map(HousingUnitId::from_uuid),
        )
        .map_err(|_| MemberError::UnitNotFound)?;

        let mut active: members::ActiveModel = member.into();
        active.moved_out_at = Set(Some(chrono::Utc::now().into()));
        let member = active.update(txn).await?;

        let mut remaining = members::Entity::find()
            .filter(members::Column::SocietyId.eq(society_id))
            .filter(members::Column::MovedOutAt.is_null());
        remaining = match unit {
            UnitRef::Flat { flat_id, .. } => {
                remaining.filter(members::Column::FlatId.eq(flat_id.into_inner()))
            }
            UnitRef::Housing { housing_id } => {
                remaining.filter(members::Column::HousingId.eq(housing_id.into_inner()))
            }
        };
        if remaining.count(txn).await? == 0 {
            set_occupied(txn, society_id, unit, false).await?;
        }

        rls.commit().await?;
        tracing::info!(society_id = %society_id, member_id = %member_id, "Member unassigned");
        Ok(member)
    }

    /// Lists active members of a society.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self, society_id: Uuid) -> Result<Vec<members::Model>, DbErr> {
        members::Entity::find()
            .filter(members::Column::SocietyId.eq(society_id))
            .filter(members::Column::MovedOutAt.is_null())
            .order_by_asc(members::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Finds the active membership of a user in a society.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_for_user(
        &self,
        society_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<members::Model>, DbErr> {
        members::Entity::find()
            .filter(members::Column::SocietyId.eq(society_id))
            .filter(members::Column::UserId.eq(user_id))
            .filter(members::Column::MovedOutAt.is_null())
            .one(&self.db)
            .await
    }
}

/// Splits a unit reference into raw column values.
pub(crate) fn unit_columns(unit: UnitRef) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
    let (building_id, flat_id, housing_id) = unit.into_parts();
    (
        building_id.map(BuildingId::into_inner),
        flat_id.map(FlatId::into_inner),
        housing_id.map(HousingUnitId::into_inner),
    )
}

/// Locks the unit row and sets its occupancy flag.
async fn set_occupied<C: ConnectionTrait>(
    conn: &C,
    society_id: Uuid,
    unit: UnitRef,
    occupied: bool,
) -> Result<(), MemberError> {
    let now = chrono::Utc::now().into();
    match unit {
        UnitRef::Flat {
            building_id,
            flat_id,
        } => {
            let flat = flats::Entity::find_by_id(flat_id.into_inner())
                .filter(flats::Column::SocietyId.eq(society_id))
                .filter(flats::Column::BuildingId.eq(building_id.into_inner()))
                .lock_exclusive()
                .one(conn)
                .await?
                .ok_or(MemberError::UnitNotFound)?;
            if flat.is_occupied != occupied {
                let mut active: flats::ActiveModel = flat.into();
                active.is_occupied = Set(occupied);
                active.updated_at = Set(now);
                active.update(conn).await?;
            }
        }
        UnitRef::Housing { housing_id } => {
            let unit = housing_units::Entity::find_by_id(housing_id.into_inner())
                .filter(housing_units::Column::SocietyId.eq(society_id))
                .lock_exclusive()
                .one(conn)
                .await?
                .ok_or(MemberError::UnitNotFound)?;
            if unit.is_occupied != occupied {
                let mut active: housing_units::ActiveModel = unit.into();
                active.is_occupied = Set(occupied);
                active.updated_at = Set(now);
                active.update(conn).await?;
            }
        }
    }
    Ok(())
}
