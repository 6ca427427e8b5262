//! Users and their society memberships.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use society_shared::AppError;
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::{sea_orm_active_enums::SocietyRole, societies, society_users, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email is already registered.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailTaken(_) => Self::Conflict(err.to_string()),
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login email, stored lowercase.
    pub email: String,
    /// Argon2 PHC hash.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Optional phone number.
    pub phone: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Emails are stored lowercase, so the lookup lowercases too.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmailTaken` if the email is registered already.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let email = input.email.trim().to_lowercase();
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(email.clone()),
            password_hash: Set(input.password_hash),
            full_name: Set(input.full_name),
            phone: Set(input.phone),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                UserError::EmailTaken(email)
            } else {
                UserError::Database(e)
            }
        })
    }

    /// Gets all societies a user belongs to, with the user's role in each.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_user_societies(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(societies::Model, SocietyRole)>, DbErr> {
        let rows = society_users::Entity::find()
            .filter(society_users::Column::UserId.eq(user_id))
            .find_also_related(societies::Entity)
            .order_by_asc(society_users::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(membership, society)| society.map(|s| (s, membership.role)))
            .collect())
    }
}
