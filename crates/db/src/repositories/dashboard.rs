//! Dashboard aggregates.
//!
//! Each sum is an independent query; they run concurrently and are combined
//! into [`DashboardFigures`].

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};
use society_core::balance::BalanceInputs;
use society_core::dashboard::{DashboardFigures, RowFingerprint};
use society_core::ledger::LedgerKind;
use society_shared::AppError;
use uuid::Uuid;

use super::ledger::LedgerRepository;
use crate::entities::{ledger_entries, monthly_maintenance_dues, penalties, societies};

/// Error types for dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Society not found.
    #[error("Society not found: {0}")]
    SocietyNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::SocietyNotFound(_) => Self::NotFound(err.to_string()),
            DashboardError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Dashboard repository for read-side aggregates.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
    ledger: LedgerRepository,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            ledger: LedgerRepository::new(db.clone()),
            db,
        }
    }

    /// Reads every figure the dashboard shows for a society.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::SocietyNotFound` for an unknown society.
    pub async fn figures(&self, society_id: Uuid) -> Result<DashboardFigures, DashboardError> {
        let (
            society,
            total_expenses,
            total_income,
            total_maintenance_charged,
            total_maintenance_collected,
            total_penalties,
            outstanding_penalties,
            unpaid_dues,
        ) = tokio::try_join!(
            societies::Entity::find_by_id(society_id).one(&self.db),
            self.ledger.total(society_id, LedgerKind::Expense),
            self.ledger.total(society_id, LedgerKind::Income),
            self.maintenance_total(society_id, None),
            self.maintenance_total(society_id, Some(true)),
            self.penalty_total(society_id, None),
            self.penalty_total(society_id, Some(false)),
            monthly_maintenance_dues::Entity::find()
                .filter(monthly_maintenance_dues::Column::SocietyId.eq(society_id))
                .filter(monthly_maintenance_dues::Column::MaintenancePaid.eq(false))
                .count(&self.db),
        )?;

        let society = society.ok_or(DashboardError::SocietyNotFound(society_id))?;

        Ok(DashboardFigures {
            balance: BalanceInputs {
                opening_balance: society.opening_balance,
                total_expenses,
                total_maintenance_charged,
                total_penalties,
            },
            total_income,
            total_maintenance_collected,
            outstanding_penalties,
            unpaid_dues,
        })
    }

    /// Row counts the cached summary is checked against before it is served.
    ///
    /// # Errors
    ///
    /// Returns an error if a count query fails.
    pub async fn fingerprint(&self, society_id: Uuid) -> Result<RowFingerprint, DbErr> {
        let (dues, penalties, ledger_entries) = tokio::try_join!(
            monthly_maintenance_dues::Entity::find()
                .filter(monthly_maintenance_dues::Column::SocietyId.eq(society_id))
                .count(&self.db),
            penalties::Entity::find()
                .filter(penalties::Column::SocietyId.eq(society_id))
                .count(&self.db),
            ledger_entries::Entity::find()
                .filter(ledger_entries::Column::SocietyId.eq(society_id))
                .count(&self.db),
        )?;
        Ok(RowFingerprint {
            dues,
            penalties,
            ledger_entries,
        })
    }

    /// Sum of due amounts, optionally only paid or unpaid rows.
    async fn maintenance_total(
        &self,
        society_id: Uuid,
        paid: Option<bool>,
    ) -> Result<Decimal, DbErr> {
        let mut query = monthly_maintenance_dues::Entity::find()
            .select_only()
            .column_as(
                monthly_maintenance_dues::Column::MaintenanceAmount.sum(),
                "total",
            )
            .filter(monthly_maintenance_dues::Column::SocietyId.eq(society_id));
        if let Some(paid) = paid {
            query = query.filter(monthly_maintenance_dues::Column::MaintenancePaid.eq(paid));
        }
        let total: Option<Option<Decimal>> = query.into_tuple().one(&self.db).await?;
        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }

    /// Sum of non-deleted penalties, optionally only paid or unpaid rows.
    async fn penalty_total(&self, society_id: Uuid, paid: Option<bool>) -> Result<Decimal, DbErr> {
        let mut query = penalties::Entity::find()
            .select_only()
            .column_as(penalties::Column::Amount.sum(), "total")
            .filter(penalties::Column::SocietyId.eq(society_id))
            .filter(penalties::Column::IsDeleted.eq(false));
        if let Some(paid) = paid {
            query = query.filter(penalties::Column::IsPaid.eq(paid));
        }
        let total: Option<Option<Decimal>> = query.into_tuple().one(&self.db).await?;
        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }
}
