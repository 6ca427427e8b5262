//! `SeaORM` Entity for flats table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "flats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    pub building_id: Uuid,
    pub flat_number: String,
    pub floor_number: i32,
    pub square_foot: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 0)))")]
    pub current_maintenance: Decimal,
    pub is_occupied: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
