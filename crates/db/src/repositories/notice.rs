//! Notice repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use society_shared::AppError;
use uuid::Uuid;

use crate::entities::notices;

/// Error types for notice operations.
#[derive(Debug, thiserror::Error)]
pub enum NoticeRepoError {
    /// Notice not found in the society.
    #[error("Notice not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<NoticeRepoError> for AppError {
    fn from(err: NoticeRepoError) -> Self {
        match err {
            NoticeRepoError::NotFound(_) => Self::NotFound(err.to_string()),
            NoticeRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Notice repository.
#[derive(Debug, Clone)]
pub struct NoticeRepository {
    db: DatabaseConnection,
}

impl NoticeRepository {
    /// Creates a new notice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Publishes a notice. Title and body are expected to be validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        society_id: Uuid,
        title: String,
        body: String,
        expires_at: Option<DateTime<Utc>>,
        created_by: Uuid,
    ) -> Result<notices::Model, DbErr> {
        let notice = notices::ActiveModel {
            id: Set(Uuid::now_v7()),
            society_id: Set(society_id),
            title: Set(title),
            body: Set(body),
            expires_at: Set(expires_at.map(Into::into)),
            created_by: Set(created_by),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(society_id = %society_id, notice_id = %notice.id, "Notice published");
        Ok(notice)
    }

    /// Lists notices that have not expired at `now`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_active(
        &self,
        society_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<notices::Model>, DbErr> {
        notices::Entity::find()
            .filter(notices::Column::SocietyId.eq(society_id))
            .filter(
                Condition::any()
                    .add(notices::Column::ExpiresAt.is_null())
                    .add(notices::Column::ExpiresAt.gt(now)),
            )
            .order_by_desc(notices::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Deletes a notice.
    ///
    /// # Errors
    ///
    /// Returns `NoticeRepoError::NotFound` for an unknown notice.
    pub async fn delete(&self, society_id: Uuid, notice_id: Uuid) -> Result<(), NoticeRepoError> {
        let notice = notices::Entity::find_by_id(notice_id)
            .filter(notices::Column::SocietyId.eq(society_id))
            .one(&self.db)
            .await?
            .ok_or(NoticeRepoError::NotFound(notice_id))?;

        notice.delete(&self.db).await?;
        tracing::info!(society_id = %society_id, notice_id = %notice_id, "Notice deleted");
        Ok(())
    }
}
