//! Monthly maintenance dues repository.
//!
//! Generation is one `INSERT ... SELECT ... WHERE NOT EXISTS` per unit
//! category. The unique partial indexes on `(flat_id, month_year)` and
//! `(housing_id, month_year)` back the guard, so concurrent or repeated runs
//! for one month never create a second row for a unit.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, Statement,
    Value,
};
use society_core::dues::{DueDraft, DuesPlanner, GenerationSummary, OccupiedUnit, UnitRef};
use society_core::lifecycle::{PaymentState, TransitionOutcome};
use society_core::period::MonthYear;
use society_shared::AppError;
use society_shared::types::{
    BuildingId, FlatId, HousingUnitId, MemberId, PageRequest, SocietyId,
};
use uuid::Uuid;

use super::member::unit_columns;
use crate::entities::{flats, housing_units, members, monthly_maintenance_dues};
use crate::rls::SocietyScoped;

const GENERATE_FLAT_DUES_SQL: &str = r"
INSERT INTO monthly_maintenance_dues
    (id, society_id, building_id, flat_id, housing_id, member_ids, month_year, maintenance_amount)
SELECT gen_random_uuid(), f.society_id, f.building_id, f.id, NULL, m.member_ids, $1, f.current_maintenance
FROM flats f
JOIN LATERAL (
    SELECT array_agg(mb.id ORDER BY mb.id) AS member_ids
    FROM members mb
    WHERE mb.flat_id = f.id AND mb.moved_out_at IS NULL
) m ON TRUE
WHERE f.is_occupied
  AND m.member_ids IS NOT NULL
  AND ($2::uuid IS NULL OR f.society_id = $2)
  AND NOT EXISTS (
      SELECT 1 FROM monthly_maintenance_dues d
      WHERE d.flat_id = f.id AND d.month_year = $1
  )
ON CONFLICT DO NOTHING
";

const GENERATE_HOUSING_DUES_SQL: &str = r"
INSERT INTO monthly_maintenance_dues
    (id, society_id, building_id, flat_id, housing_id, member_ids, month_year, maintenance_amount)
SELECT gen_random_uuid(), h.society_id, NULL, NULL, h.id, m.member_ids, $1, h.current_maintenance
FROM housing_units h
JOIN LATERAL (
    SELECT array_agg(mb.id ORDER BY mb.id) AS member_ids
    FROM members mb
    WHERE mb.housing_id = h.id AND mb.moved_out_at IS NULL
) m ON TRUE
WHERE h.is_occupied
  AND m.member_ids IS NOT NULL
  AND ($2::uuid IS NULL OR h.society_id = $2)
  AND NOT EXISTS (
      SELECT 1 FROM monthly_maintenance_dues d
      WHERE d.housing_id = h.id AND d.month_year = $1
  )
ON CONFLICT DO NOTHING
";

const INSERT_DUE_SQL: &str = r"
INSERT INTO monthly_maintenance_dues
    (id, society_id, building_id, flat_id, housing_id, member_ids, month_year, maintenance_amount)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
ON CONFLICT DO NOTHING
";

/// Error types for dues operations.
#[derive(Debug, thiserror::Error)]
pub enum DuesRepoError {
    /// Due not found in the society.
    #[error("Due not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DuesRepoError> for AppError {
    fn from(err: DuesRepoError) -> Self {
        match err {
            DuesRepoError::NotFound(_) => Self::NotFound(err.to_string()),
            DuesRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filter for listing dues.
#[derive(Debug, Clone, Default)]
pub struct DuesFilter {
    /// Only this billing month.
    pub month: Option<MonthYear>,
    /// Only paid (`true`) or unpaid (`false`) dues.
    pub paid: Option<bool>,
    /// Only dues billed to this member.
    pub member_id: Option<Uuid>,
}

/// Dues repository.
#[derive(Debug, Clone)]
pub struct DuesRepository {
    db: DatabaseConnection,
}

impl DuesRepository {
    /// Creates a new dues repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Ensures every occupied unit has exactly one due for `month`.
    ///
    /// With `society_id` set only that society is processed; `None` runs
    /// across all societies, which is what the cron binary does. Safe to
    /// re-run: units already billed for the month are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if either statement fails.
    pub async fn generate_for_month(
        &self,
        society_id: Option<Uuid>,
        month: MonthYear,
    ) -> Result<GenerationSummary, DbErr> {
        let values = vec![Value::from(month.first_day()), Value::from(society_id)];

        let flats_created = self
            .db
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                GENERATE_FLAT_DUES_SQL,
                values.clone(),
            ))
            .await?
            .rows_affected();
        let housing_units_created = self
            .db
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                GENERATE_HOUSING_DUES_SQL,
                values,
            ))
            .await?
            .rows_affected();

        Ok(GenerationSummary {
            flats_created,
            housing_units_created,
        })
    }

    /// Occupied units of a society with their active members.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn occupied_units(&self, society_id: Uuid) -> Result<Vec<OccupiedUnit>, DbErr> {
        let (flat_rows, housing_rows, member_rows) = tokio::try_join!(
            flats::Entity::find()
                .filter(flats::Column::SocietyId.eq(society_id))
                .filter(flats::Column::IsOccupied.eq(true))
                .all(&self.db),
            housing_units::Entity::find()
                .filter(housing_units::Column::SocietyId.eq(society_id))
                .filter(housing_units::Column::IsOccupied.eq(true))
                .all(&self.db),
            members::Entity::find()
                .filter(members::Column::SocietyId.eq(society_id))
                .filter(members::Column::MovedOutAt.is_null())
                .all(&self.db),
        )?;

        let members_of = |predicate: &dyn Fn(&members::Model) -> bool| -> Vec<MemberId> {
            member_rows
                .iter()
                .filter(|m| predicate(m))
                .map(|m| MemberId::from_uuid(m.id))
                .collect()
        };

        let mut units = Vec::with_capacity(flat_rows.len() + housing_rows.len());
        for flat in flat_rows {
            units.push(OccupiedUnit {
                unit: UnitRef::Flat {
                    building_id: BuildingId::from_uuid(flat.building_id),
                    flat_id: FlatId::from_uuid(flat.id),
                },
                current_maintenance: flat.current_maintenance,
                is_occupied: flat.is_occupied,
                member_ids: members_of(&|m| m.flat_id == Some(flat.id)),
            });
        }
        for unit in housing_rows {
            units.push(OccupiedUnit {
                unit: UnitRef::Housing {
                    housing_id: HousingUnitId::from_uuid(unit.id),
                },
                current_maintenance: unit.current_maintenance,
                is_occupied: unit.is_occupied,
                member_ids: members_of(&|m| m.housing_id == Some(unit.id)),
            });
        }
        Ok(units)
    }

    /// Units already billed for `month`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn billed_units(
        &self,
        society_id: Uuid,
        month: MonthYear,
    ) -> Result<HashSet<UnitRef>, DbErr> {
        let rows = monthly_maintenance_dues::Entity::find()
            .filter(monthly_maintenance_dues::Column::SocietyId.eq(society_id))
            .filter(monthly_maintenance_dues::Column::MonthYear.eq(month.first_day()))
            .all(&self.db)
            .await?;

        Ok(rows.iter().filter_map(due_unit).collect())
    }

    /// Lists the dues a generation run for `month` would create.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn units_needing_due(
        &self,
        society_id: Uuid,
        month: MonthYear,
    ) -> Result<Vec<DueDraft>, DbErr> {
        let (units, billed) = tokio::try_join!(
            self.occupied_units(society_id),
            self.billed_units(society_id, month)
        )?;
        Ok(DuesPlanner::plan(
            SocietyId::from_uuid(society_id),
            month,
            &units,
            &billed,
        ))
    }

    /// Inserts one due unless the unit is already billed for its month.
    ///
    /// Returns `true` if a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails for any reason other than the
    /// unit-month guard.
    pub async fn insert_if_absent(&self, draft: &DueDraft) -> Result<bool, DbErr> {
        let (building_id, flat_id, housing_id) = unit_columns(draft.unit);
        let member_ids: Vec<Uuid> = draft.member_ids.iter().map(|m| m.into_inner()).collect();

        let result = self
            .db
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                INSERT_DUE_SQL,
                [
                    Value::from(Uuid::now_v7()),
                    Value::from(draft.society_id.into_inner()),
                    Value::from(building_id),
                    Value::from(flat_id),
                    Value::from(housing_id),
                    Value::from(member_ids),
                    Value::from(draft.month.first_day()),
                    Value::from(draft.maintenance_amount),
                ],
            ))
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Lists dues matching the filter, newest month first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        society_id: Uuid,
        filter: DuesFilter,
    ) -> Result<Vec<monthly_maintenance_dues::Model>, DbErr> {
        filtered(society_id, &filter).all(&self.db).await
    }

    /// Lists one page of dues matching the filter, with the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_page(
        &self,
        society_id: Uuid,
        filter: DuesFilter,
        page: PageRequest,
    ) -> Result<(Vec<monthly_maintenance_dues::Model>, u64), DbErr> {
        let query = filtered(society_id, &filter);
        let (rows, total) = tokio::try_join!(
            query
                .clone()
                .offset(page.offset())
                .limit(page.limit())
                .all(&self.db),
            query.count(&self.db),
        )?;
        Ok((rows, total))
    }

    /// Finds a due in a society.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find(
        &self,
        society_id: Uuid,
        due_id: Uuid,
    ) -> Result<Option<monthly_maintenance_dues::Model>, DbErr> {
        monthly_maintenance_dues::Entity::find_by_id(due_id)
            .filter(monthly_maintenance_dues::Column::SocietyId.eq(society_id))
            .one(&self.db)
            .await
    }

    /// Marks a due paid in full. Re-marking reports `AlreadyApplied`.
    ///
    /// # Errors
    ///
    /// Returns `DuesRepoError::NotFound` for an unknown due.
    pub async fn mark_paid(
        &self,
        society_id: Uuid,
        due_id: Uuid,
    ) -> Result<(monthly_maintenance_dues::Model, TransitionOutcome), DuesRepoError> {
        let rls = self.db.with_rls(society_id).await?;
        let result = mark_due_paid(rls.transaction(), society_id, due_id, None, Utc::now()).await?;
        rls.commit().await?;
        Ok(result)
    }
}

/// Base query for the dues list: society scope, filters, then month desc.
fn filtered(society_id: Uuid, filter: &DuesFilter) -> Select<monthly_maintenance_dues::Entity> {
    let mut query = monthly_maintenance_dues::Entity::find()
        .filter(monthly_maintenance_dues::Column::SocietyId.eq(society_id));
    if let Some(month) = filter.month {
        query = query.filter(monthly_maintenance_dues::Column::MonthYear.eq(month.first_day()));
    }
    if let Some(paid) = filter.paid {
        query = query.filter(monthly_maintenance_dues::Column::MaintenancePaid.eq(paid));
    }
    if let Some(member_id) = filter.member_id {
        query = query.filter(Expr::cust_with_values("$1 = ANY(member_ids)", [member_id]));
    }
    query
        .order_by_desc(monthly_maintenance_dues::Column::MonthYear)
        .order_by_asc(monthly_maintenance_dues::Column::CreatedAt)
}

/// Marks a due paid on an open transaction, locking the row first.
pub(crate) async fn mark_due_paid<C: ConnectionTrait>(
    conn: &C,
    society_id: Uuid,
    due_id: Uuid,
    payment_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<(monthly_maintenance_dues::Model, TransitionOutcome), DuesRepoError> {
    let due = monthly_maintenance_dues::Entity::find_by_id(due_id)
        .filter(monthly_maintenance_dues::Column::SocietyId.eq(society_id))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(DuesRepoError::NotFound(due_id))?;

    let state = PaymentState::from_columns(
        due.maintenance_paid,
        due.maintenance_paid_at.map(|t| t.with_timezone(&Utc)),
        now,
    );
    let (state, outcome) = state.mark_paid(now);
    if outcome.was_already_applied() {
        return Ok((due, outcome));
    }

    let mut active: monthly_maintenance_dues::ActiveModel = due.into();
    active.maintenance_paid = Set(true);
    active.maintenance_paid_at = Set(state.paid_at().map(Into::into));
    if payment_id.is_some() {
        active.payment_id = Set(payment_id);
    }
    let due = active.update(conn).await?;
    tracing::info!(society_id = %society_id, due_id = %due_id, "Due marked paid");
    Ok((due, outcome))
}

/// Unit a stored due is billed to, skipping rows that fail the unit check.
fn due_unit(due: &monthly_maintenance_dues::Model) -> Option<UnitRef> {
    UnitRef::from_parts(
        due.building_id.map(BuildingId::from_uuid),
        due.flat_id.map(FlatId::from_uuid),
        due.housing_id.map(HousingUnitId::from_uuid),
    )
    .ok()
}
