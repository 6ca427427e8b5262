//! Penalty repository.
//!
//! Rows are loaded into [`society_core::penalty::Penalty`], transitioned
//! there and written back, so the paid and deleted rules live in one place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use society_core::dues::{DuesError, UnitRef};
use society_core::lifecycle::{PaymentState, TransitionOutcome};
use society_core::penalty::{DeletionState, Penalty, PenaltyError, validate_new_penalty};
use society_shared::AppError;
use society_shared::types::{BuildingId, FlatId, HousingUnitId, PenaltyId, SocietyId, UserId};
use uuid::Uuid;

use super::member::unit_columns;
use crate::entities::{flats, housing_units, penalties};
use crate::rls::SocietyScoped;

/// Error types for penalty operations.
#[derive(Debug, thiserror::Error)]
pub enum PenaltyRepoError {
    /// Penalty not found in the society.
    #[error("Penalty not found: {0}")]
    NotFound(Uuid),

    /// Charged unit not found in the society.
    #[error("Unit not found")]
    UnitNotFound,

    /// Rejected by the penalty rules.
    #[error(transparent)]
    Rule(#[from] PenaltyError),

    /// Stored row fails the unit check.
    #[error(transparent)]
    Unit(#[from] DuesError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PenaltyRepoError> for AppError {
    fn from(err: PenaltyRepoError) -> Self {
        match err {
            PenaltyRepoError::NotFound(_) | PenaltyRepoError::UnitNotFound => {
                Self::NotFound(err.to_string())
            }
            PenaltyRepoError::Rule(e) => e.into(),
            PenaltyRepoError::Unit(e) => Self::Internal(e.to_string()),
            PenaltyRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for charging a penalty.
#[derive(Debug, Clone)]
pub struct CreatePenaltyInput {
    /// Charged unit.
    pub unit: UnitRef,
    /// Amount in minor units.
    pub amount: Decimal,
    /// Why it is charged.
    pub reason: String,
    /// Acting user.
    pub action_by: Uuid,
}

/// Penalty repository.
#[derive(Debug, Clone)]
pub struct PenaltyRepository {
    db: DatabaseConnection,
}

impl PenaltyRepository {
    /// Creates a new penalty repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Charges an unpaid, active penalty against a unit.
    ///
    /// # Errors
    ///
    /// Returns `PenaltyRepoError::Rule` for a bad amount or reason and
    /// `PenaltyRepoError::UnitNotFound` for a unit outside the society.
    pub async fn create(
        &self,
        society_id: Uuid,
        input: CreatePenaltyInput,
    ) -> Result<Penalty, PenaltyRepoError> {
        validate_new_penalty(input.amount, &input.reason)?;
        self.ensure_unit(society_id, input.unit).await?;

        let (building_id, flat_id, housing_id) = unit_columns(input.unit);
        let now = Utc::now().into();
        let model = penalties::ActiveModel {
            id: Set(Uuid::now_v7()),
            society_id: Set(society_id),
            building_id: Set(building_id),
            flat_id: Set(flat_id),
            housing_id: Set(housing_id),
            amount: Set(input.amount),
            reason: Set(input.reason.trim().to_string()),
            is_paid: Set(false),
            paid_at: Set(None),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
            action_by: Set(input.action_by),
            payment_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(
            society_id = %society_id,
            penalty_id = %model.id,
            amount = %model.amount,
            "Penalty created"
        );
        Ok(to_penalty(&model)?)
    }

    /// Lists penalties, newest first. Deleted rows appear only with
    /// `include_deleted`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        society_id: Uuid,
        include_deleted: bool,
    ) -> Result<Vec<Penalty>, PenaltyRepoError> {
        let mut query =
            penalties::Entity::find().filter(penalties::Column::SocietyId.eq(society_id));
        if !include_deleted {
            query = query.filter(penalties::Column::IsDeleted.eq(false));
        }
        let rows = query
            .order_by_desc(penalties::Column::CreatedAt)
            .all(&self.db)
            .await?;

        rows.iter()
            .map(|row| to_penalty(row).map_err(Into::into))
            .collect()
    }

    /// Finds a penalty by id, deleted or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find(
        &self,
        society_id: Uuid,
        penalty_id: Uuid,
    ) -> Result<Option<Penalty>, PenaltyRepoError> {
        let row = penalties::Entity::find_by_id(penalty_id)
            .filter(penalties::Column::SocietyId.eq(society_id))
            .one(&self.db)
            .await?;
        Ok(row.as_ref().map(to_penalty).transpose()?)
    }

    /// Marks a penalty paid.
    ///
    /// # Errors
    ///
    /// Returns `PenaltyError::Deleted` (as `PenaltyRepoError::Rule`) for a
    /// deleted penalty.
    pub async fn mark_paid(
        &self,
        society_id: Uuid,
        penalty_id: Uuid,
    ) -> Result<(Penalty, TransitionOutcome), PenaltyRepoError> {
        let rls = self.db.with_rls(society_id).await?;
        let result =
            mark_penalty_paid(rls.transaction(), society_id, penalty_id, None, Utc::now()).await?;
        rls.commit().await?;
        Ok(result)
    }

    /// Soft-deletes a penalty.
    ///
    /// # Errors
    ///
    /// Returns `PenaltyError::AlreadyDeleted` (as `PenaltyRepoError::Rule`)
    /// on a second deletion.
    pub async fn mark_deleted(
        &self,
        society_id: Uuid,
        penalty_id: Uuid,
        deleted_by: Uuid,
    ) -> Result<Penalty, PenaltyRepoError> {
        let rls = self.db.with_rls(society_id).await?;
        let txn = rls.transaction();

        let row = lock_penalty(txn, society_id, penalty_id).await?;
        let mut penalty = to_penalty(&row)?;
        penalty.mark_deleted(Utc::now(), UserId::from_uuid(deleted_by))?;

        let mut active: penalties::ActiveModel = row.into();
        if let DeletionState::Deleted { at, by } = penalty.deletion {
            active.is_deleted = Set(true);
            active.deleted_at = Set(Some(at.into()));
            active.deleted_by = Set(Some(by.into_inner()));
        }
        active.updated_at = Set(Utc::now().into());
        active.update(txn).await?;

        rls.commit().await?;
        tracing::info!(
            society_id = %society_id,
            penalty_id = %penalty_id,
            deleted_by = %deleted_by,
            "Penalty deleted"
        );
        Ok(penalty)
    }

    async fn ensure_unit(&self, society_id: Uuid, unit: UnitRef) -> Result<(), PenaltyRepoError> {
        let found = match unit {
            UnitRef::Flat {
                building_id,
                flat_id,
            } => flats::Entity::find_by_id(flat_id.into_inner())
                .filter(flats::Column::SocietyId.eq(society_id))
                .filter(flats::Column::BuildingId.eq(building_id.into_inner()))
                .one(&self.db)
                .await?
                .is_some(),
            UnitRef::Housing { housing_id } => {
                housing_units::Entity::find_by_id(housing_id.into_inner())
                    .filter(housing_units::Column::SocietyId.eq(society_id))
                    .one(&self.db)
                    .await?
                    .is_some()
            }
        };
        if found {
            Ok(())
        } else {
            Err(PenaltyRepoError::UnitNotFound)
        }
    }
}

/// Marks a penalty paid on an open transaction, locking the row first.
pub(crate) async fn mark_penalty_paid<C: ConnectionTrait>(
    conn: &C,
    society_id: Uuid,
    penalty_id: Uuid,
    payment_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<(Penalty, TransitionOutcome), PenaltyRepoError> {
    let row = lock_penalty(conn, society_id, penalty_id).await?;
    let mut penalty = to_penalty(&row)?;
    let outcome = penalty.mark_paid(now)?;
    if outcome.was_already_applied() {
        return Ok((penalty, outcome));
    }

    let mut active: penalties::ActiveModel = row.into();
    active.is_paid = Set(true);
    active.paid_at = Set(penalty.payment.paid_at().map(Into::into));
    if payment_id.is_some() {
        active.payment_id = Set(payment_id);
    }
    active.updated_at = Set(now.into());
    active.update(conn).await?;

    tracing::info!(society_id = %society_id, penalty_id = %penalty_id, "Penalty marked paid");
    Ok((penalty, outcome))
}

/// Loads a penalty with `FOR UPDATE` so concurrent pay/delete calls serialize.
async fn lock_penalty<C: ConnectionTrait>(
    conn: &C,
    society_id: Uuid,
    penalty_id: Uuid,
) -> Result<penalties::Model, PenaltyRepoError> {
    penalties::Entity::find_by_id(penalty_id)
        .filter(penalties::Column::SocietyId.eq(society_id))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(PenaltyRepoError::NotFound(penalty_id))
}

/// Converts a stored row into the domain penalty.
pub(crate) fn to_penalty(row: &penalties::Model) -> Result<Penalty, DuesError> {
    let unit = UnitRef::from_parts(
        row.building_id.map(BuildingId::from_uuid),
        row.flat_id.map(FlatId::from_uuid),
        row.housing_id.map(HousingUnitId::from_uuid),
    )?;
    let created_at = row.created_at.with_timezone(&Utc);
    let updated_at = row.updated_at.with_timezone(&Utc);

    let deletion = match (row.is_deleted, row.deleted_by) {
        (true, Some(by)) => DeletionState::Deleted {
            at: row
                .deleted_at
                .map_or(updated_at, |t| t.with_timezone(&Utc)),
            by: UserId::from_uuid(by),
        },
        _ => DeletionState::Active,
    };

    Ok(Penalty {
        id: PenaltyId::from_uuid(row.id),
        society_id: SocietyId::from_uuid(row.society_id),
        unit,
        amount: row.amount,
        reason: row.reason.clone(),
        payment: PaymentState::from_columns(
            row.is_paid,
            row.paid_at.map(|t| t.with_timezone(&Utc)),
            updated_at,
        ),
        deletion,
        action_by: UserId::from_uuid(row.action_by),
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row() -> penalties::Model {
        let now = Utc::now().into();
        penalties::Model {
            id: Uuid::now_v7(),
            society_id: Uuid::now_v7(),
            building_id: None,
            flat_id: None,
            housing_id: Some(Uuid::now_v7()),
            amount: dec!(500),
            reason: "Late payment".to_string(),
            is_paid: false,
            paid_at: None,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            action_by: Uuid::now_v7(),
            payment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_to_penalty_active_unpaid() {
        let row = row();
        let penalty = to_penalty(&row).unwrap();
        assert_eq!(penalty.id.into_inner(), row.id);
        assert!(!penalty.payment.is_paid());
        assert_eq!(penalty.deletion, DeletionState::Active);
        assert!(matches!(penalty.unit, UnitRef::Housing { .. }));
    }

    #[test]
    fn test_to_penalty_deleted() {
        let mut row = row();
        let by = Uuid::now_v7();
        row.is_deleted = true;
        row.deleted_by = Some(by);
        row.deleted_at = Some(Utc::now().into());

        let penalty = to_penalty(&row).unwrap();
        match penalty.deletion {
            DeletionState::Deleted { by: deleted_by, .. } => {
                assert_eq!(deleted_by.into_inner(), by);
            }
            DeletionState::Active => panic!("expected deleted state"),
        }
    }

    #[test]
    fn test_to_penalty_rejects_ambiguous_unit() {
        let mut row = row();
        row.flat_id = Some(Uuid::now_v7());
        assert_eq!(to_penalty(&row), Err(DuesError::AmbiguousUnit));
    }
}
