//! Society repository: tenant roots and per-society roles.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use society_shared::AppError;
use uuid::Uuid;

use crate::entities::{
    sea_orm_active_enums::{SocietyRole, SocietyType},
    societies, society_users, users,
};

/// Error types for society operations.
#[derive(Debug, thiserror::Error)]
pub enum SocietyError {
    /// Society not found.
    #[error("Society not found: {0}")]
    NotFound(Uuid),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Opening balance is fractional.
    #[error("Opening balance must be a whole amount, got {0}")]
    InvalidOpeningBalance(Decimal),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SocietyError> for AppError {
    fn from(err: SocietyError) -> Self {
        match err {
            SocietyError::NotFound(_) | SocietyError::UserNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            SocietyError::InvalidOpeningBalance(_) => Self::Validation(err.to_string()),
            SocietyError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a society.
#[derive(Debug, Clone)]
pub struct CreateSocietyInput {
    /// Display name.
    pub name: String,
    /// Housing, residential or commercial.
    pub society_type: SocietyType,
    /// Street address.
    pub address_line: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Postal code.
    pub pincode: String,
    /// Opening balance in minor units, may be negative.
    pub opening_balance: Decimal,
}

/// Input for updating a society. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateSocietyInput {
    /// New name.
    pub name: Option<String>,
    /// New street address.
    pub address_line: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New state.
    pub state: Option<String>,
    /// New postal code.
    pub pincode: Option<String>,
    /// New opening balance.
    pub opening_balance: Option<Decimal>,
}

/// Society repository for CRUD and role lookups.
#[derive(Debug, Clone)]
pub struct SocietyRepository {
    db: DatabaseConnection,
}

impl SocietyRepository {
    /// Creates a new society repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a society by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<societies::Model>, DbErr> {
        societies::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists every society id, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_ids(&self) -> Result<Vec<Uuid>, DbErr> {
        societies::Entity::find()
            .select_only()
            .column(societies::Column::Id)
            .order_by_asc(societies::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Creates a society with its creator as super admin.
    ///
    /// # Errors
    ///
    /// Returns an error for a fractional opening balance or a failed insert.
    pub async fn create_with_super_admin(
        &self,
        input: CreateSocietyInput,
        creator_id: Uuid,
    ) -> Result<societies::Model, SocietyError> {
        if !input.opening_balance.fract().is_zero() {
            return Err(SocietyError::InvalidOpeningBalance(input.opening_balance));
        }

        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();
        let society_id = Uuid::now_v7();

        let society = societies::ActiveModel {
            id: Set(society_id),
            name: Set(input.name),
            society_type: Set(input.society_type),
            address_line: Set(input.address_line),
            city: Set(input.city),
            state: Set(input.state),
            pincode: Set(input.pincode),
            opening_balance: Set(input.opening_balance),
            created_by: Set(creator_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        society_users::ActiveModel {
            society_id: Set(society_id),
            user_id: Set(creator_id),
            role: Set(SocietyRole::SuperAdmin),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(society)
    }

    /// Updates a society's details.
    ///
    /// # Errors
    ///
    /// Returns `SocietyError::NotFound` if the society does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateSocietyInput,
    ) -> Result<societies::Model, SocietyError> {
        if let Some(balance) = input.opening_balance
            && !balance.fract().is_zero()
        {
            return Err(SocietyError::InvalidOpeningBalance(balance));
        }

        let society = societies::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SocietyError::NotFound(id))?;

        let mut active: societies::ActiveModel = society.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(address_line) = input.address_line {
            active.address_line = Set(address_line);
        }
        if let Some(city) = input.city {
            active.city = Set(city);
        }
        if let Some(state) = input.state {
            active.state = Set(state);
        }
        if let Some(pincode) = input.pincode {
            active.pincode = Set(pincode);
        }
        if let Some(balance) = input.opening_balance {
            active.opening_balance = Set(balance);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Gets a user's role in a society.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_role(
        &self,
        society_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<SocietyRole>, DbErr> {
        Ok(society_users::Entity::find_by_id((society_id, user_id))
            .one(&self.db)
            .await?
            .map(|m| m.role))
    }

    /// Grants or changes a user's role in a society.
    ///
    /// # Errors
    ///
    /// Returns `SocietyError::UserNotFound` for an unknown user.
    pub async fn set_role(
        &self,
        society_id: Uuid,
        user_id: Uuid,
        role: SocietyRole,
    ) -> Result<society_users::Model, SocietyError> {
        if users::Entity::find_by_id(user_id).one(&self.db).await?.is_none() {
            return Err(SocietyError::UserNotFound(user_id));
        }

        let now = chrono::Utc::now().into();
        if let Some(existing) = society_users::Entity::find_by_id((society_id, user_id))
            .one(&self.db)
            .await?
        {
            let mut active: society_users::ActiveModel = existing.into();
            active.role = Set(role);
            active.updated_at = Set(now);
            return Ok(active.update(&self.db).await?);
        }

        Ok(society_users::ActiveModel {
            society_id: Set(society_id),
            user_id: Set(user_id),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?)
    }

    /// Lists users of a society with their roles.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_users(
        &self,
        society_id: Uuid,
    ) -> Result<Vec<(users::Model, SocietyRole)>, DbErr> {
        let rows = society_users::Entity::find()
            .filter(society_users::Column::SocietyId.eq(society_id))
            .find_also_related(users::Entity)
            .order_by_asc(society_users::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(membership, user)| user.map(|u| (u, membership.role)))
            .collect())
    }
}
