//! `SeaORM` Entity for maintenance_allocations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance_allocations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    pub pending_maintenance_id: Uuid,
    pub month_year: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 0)))")]
    pub amount: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub payment_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
