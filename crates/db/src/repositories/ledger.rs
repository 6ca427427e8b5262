//! Income and expense ledger repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use society_core::ledger::{LedgerEntryDraft, LedgerError, LedgerKind};
use society_shared::AppError;
use uuid::Uuid;

use crate::entities::ledger_entries;

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerRepoError {
    /// Entry failed validation.
    #[error(transparent)]
    Invalid(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LedgerRepoError> for AppError {
    fn from(err: LedgerRepoError) -> Self {
        match err {
            LedgerRepoError::Invalid(e) => e.into(),
            LedgerRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filter for listing ledger entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerFilter {
    /// Only this month number.
    pub month: Option<u32>,
    /// Only this year.
    pub year: Option<i32>,
}

/// Ledger repository for expenses and incomes.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a validated entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        society_id: Uuid,
        draft: LedgerEntryDraft,
        created_by: Uuid,
    ) -> Result<ledger_entries::Model, LedgerRepoError> {
        let month =
            i32::try_from(draft.month).map_err(|_| LedgerError::InvalidMonth(draft.month))?;

        let entry = ledger_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            society_id: Set(society_id),
            kind: Set(draft.kind.into()),
            entry_type: Set(draft.entry_type),
            reason: Set(draft.reason),
            amount: Set(draft.amount),
            month: Set(month),
            year: Set(draft.year),
            created_by: Set(created_by),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        Ok(entry)
    }

    /// Lists entries of one kind, newest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        society_id: Uuid,
        kind: LedgerKind,
        filter: LedgerFilter,
    ) -> Result<Vec<ledger_entries::Model>, DbErr> {
        let kind: crate::entities::sea_orm_active_enums::LedgerKind = kind.into();
        let mut query = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::SocietyId.eq(society_id))
            .filter(ledger_entries::Column::Kind.eq(kind));
        if let Some(month) = filter.month {
            query = query.filter(ledger_entries::Column::Month.eq(month));
        }
        if let Some(year) = filter.year {
            query = query.filter(ledger_entries::Column::Year.eq(year));
        }

        query
            .order_by_desc(ledger_entries::Column::Year)
            .order_by_desc(ledger_entries::Column::Month)
            .order_by_desc(ledger_entries::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Sums all entries of one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn total(&self, society_id: Uuid, kind: LedgerKind) -> Result<Decimal, DbErr> {
        let kind: crate::entities::sea_orm_active_enums::LedgerKind = kind.into();
        let total: Option<Option<Decimal>> = ledger_entries::Entity::find()
            .select_only()
            .column_as(ledger_entries::Column::Amount.sum(), "total")
            .filter(ledger_entries::Column::SocietyId.eq(society_id))
            .filter(ledger_entries::Column::Kind.eq(kind))
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }
}
