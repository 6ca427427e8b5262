//! `SeaORM` Entity for payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    #[sea_orm(unique)]
    pub gateway_payment_id: String,
    pub gateway_order_id: String,
    pub method: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 0)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 0)))")]
    pub fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 0)))")]
    pub tax: Decimal,
    pub confirmed_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
