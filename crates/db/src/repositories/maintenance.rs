//! Pending maintenance and allocation repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use society_core::allocation::{
    AllocationError, AllocationMode, AllocationPlanner, PlannedAllocation,
};
use society_core::lifecycle::{PaymentState, TransitionOutcome};
use society_core::period::MonthYear;
use society_shared::AppError;
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::{maintenance_allocations, monthly_maintenance_dues, pending_maintenances};
use crate::rls::SocietyScoped;

/// Error types for pending maintenance operations.
#[derive(Debug, thiserror::Error)]
pub enum MaintenanceError {
    /// Due not found in the society.
    #[error("Due not found: {0}")]
    DueNotFound(Uuid),

    /// Pending maintenance not found.
    #[error("Pending maintenance not found: {0}")]
    PendingNotFound(Uuid),

    /// Allocation not found.
    #[error("Allocation not found: {0}")]
    AllocationNotFound(Uuid),

    /// The due already has a pending maintenance record.
    #[error("Due {0} already has pending maintenance allocated")]
    AlreadyAllocated(Uuid),

    /// The requested split is invalid.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<MaintenanceError> for AppError {
    fn from(err: MaintenanceError) -> Self {
        match err {
            MaintenanceError::DueNotFound(_)
            | MaintenanceError::PendingNotFound(_)
            | MaintenanceError::AllocationNotFound(_) => Self::NotFound(err.to_string()),
            MaintenanceError::AlreadyAllocated(_) => Self::Conflict(err.to_string()),
            MaintenanceError::Allocation(e) => e.into(),
            MaintenanceError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for distributing a pending amount against a due.
#[derive(Debug, Clone)]
pub struct CreatePendingInput {
    /// Due the arrears belong to.
    pub due_id: Uuid,
    /// Lump amount in minor units.
    pub amount: Decimal,
    /// Distribution mode.
    pub mode: AllocationMode,
    /// First month; defaults to the due's month.
    pub start_month: Option<MonthYear>,
    /// Caller-chosen split replacing the default one.
    pub manual: Option<Vec<PlannedAllocation>>,
    /// Acting user.
    pub created_by: Uuid,
}

/// A pending maintenance record with its allocations ordered by month.
#[derive(Debug, Clone, Serialize)]
pub struct PendingWithAllocations {
    /// The pending record.
    pub pending: pending_maintenances::Model,
    /// Its monthly allocations.
    pub allocations: Vec<maintenance_allocations::Model>,
}

/// Repository for pending maintenance and its allocations.
#[derive(Debug, Clone)]
pub struct MaintenanceRepository {
    db: DatabaseConnection,
}

impl MaintenanceRepository {
    /// Creates a new maintenance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a pending amount against a due and writes its allocations.
    ///
    /// The due row is locked for the duration of the transaction, so two
    /// concurrent requests for one due cannot both allocate.
    ///
    /// # Errors
    ///
    /// Returns `MaintenanceError::AlreadyAllocated` if the due already has a
    /// pending record and `MaintenanceError::Allocation` for an invalid split.
    pub async fn create_pending(
        &self,
        society_id: Uuid,
        input: CreatePendingInput,
    ) -> Result<PendingWithAllocations, MaintenanceError> {
        let rls = self.db.with_rls(society_id).await?;
        let txn = rls.transaction();

        let due = monthly_maintenance_dues::Entity::find_by_id(input.due_id)
            .filter(monthly_maintenance_dues::Column::SocietyId.eq(society_id))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(MaintenanceError::DueNotFound(input.due_id))?;

        let existing = pending_maintenances::Entity::find()
            .filter(pending_maintenances::Column::DueId.eq(due.id))
            .one(txn)
            .await?;
        if existing.is_some() {
            return Err(MaintenanceError::AlreadyAllocated(due.id));
        }

        let start = input
            .start_month
            .unwrap_or_else(|| MonthYear::from_date(due.month_year));
        let planned = AllocationPlanner::plan_or_validate(
            input.amount,
            input.mode,
            start,
            input.manual.as_deref(),
        )?;

        let now = Utc::now().into();
        let pending_id = Uuid::now_v7();
        let pending = pending_maintenances::ActiveModel {
            id: Set(pending_id),
            society_id: Set(society_id),
            due_id: Set(due.id),
            amount: Set(input.amount),
            mode: Set(input.mode.into()),
            created_by: Set(input.created_by),
            created_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                MaintenanceError::AlreadyAllocated(due.id)
            } else {
                MaintenanceError::Database(e)
            }
        })?;

        let mut allocations = Vec::with_capacity(planned.len());
        for entry in planned {
            let allocation = maintenance_allocations::ActiveModel {
                id: Set(Uuid::now_v7()),
                society_id: Set(society_id),
                pending_maintenance_id: Set(pending_id),
                month_year: Set(entry.month.first_day()),
                amount: Set(entry.amount),
                is_paid: Set(false),
                paid_at: Set(None),
                payment_id: Set(None),
                created_at: Set(now),
            }
            .insert(txn)
            .await?;
            allocations.push(allocation);
        }

        rls.commit().await?;

        Ok(PendingWithAllocations {
            pending,
            allocations,
        })
    }

    /// Finds a pending record with its allocations.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn find_pending(
        &self,
        society_id: Uuid,
        pending_id: Uuid,
    ) -> Result<Option<PendingWithAllocations>, DbErr> {
        let Some(pending) = pending_maintenances::Entity::find_by_id(pending_id)
            .filter(pending_maintenances::Column::SocietyId.eq(society_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let allocations = maintenance_allocations::Entity::find()
            .filter(maintenance_allocations::Column::PendingMaintenanceId.eq(pending.id))
            .order_by_asc(maintenance_allocations::Column::MonthYear)
            .all(&self.db)
            .await?;

        Ok(Some(PendingWithAllocations {
            pending,
            allocations,
        }))
    }

    /// Marks one allocation paid. Re-marking reports `AlreadyApplied`.
    ///
    /// # Errors
    ///
    /// Returns `MaintenanceError::AllocationNotFound` for an unknown id.
    pub async fn mark_allocation_paid(
        &self,
        society_id: Uuid,
        allocation_id: Uuid,
    ) -> Result<(maintenance_allocations::Model, TransitionOutcome), MaintenanceError> {
        let rls = self.db.with_rls(society_id).await?;
        let result = mark_allocation_paid(
            rls.transaction(),
            society_id,
            allocation_id,
            None,
            Utc::now(),
        )
        .await?;
        rls.commit().await?;
        Ok(result)
    }
}

/// Marks an allocation paid on an open transaction, locking the row first.
pub(crate) async fn mark_allocation_paid<C: ConnectionTrait>(
    conn: &C,
    society_id: Uuid,
    allocation_id: Uuid,
    payment_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<(maintenance_allocations::Model, TransitionOutcome), MaintenanceError> {
    let allocation = maintenance_allocations::Entity::find_by_id(allocation_id)
        .filter(maintenance_allocations::Column::SocietyId.eq(society_id))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(MaintenanceError::AllocationNotFound(allocation_id))?;

    let state = PaymentState::from_columns(
        allocation.is_paid,
        allocation.paid_at.map(|t| t.with_timezone(&Utc)),
        now,
    );
    let (state, outcome) = state.mark_paid(now);
    if outcome.was_already_applied() {
        return Ok((allocation, outcome));
    }

    let mut active: maintenance_allocations::ActiveModel = allocation.into();
    active.is_paid = Set(true);
    active.paid_at = Set(state.paid_at().map(Into::into));
    if payment_id.is_some() {
        active.payment_id = Set(payment_id);
    }
    let allocation = active.update(conn).await?;
    tracing::info!(
        society_id = %society_id,
        allocation_id = %allocation_id,
        "Allocation marked paid"
    );
    Ok((allocation, outcome))
}
