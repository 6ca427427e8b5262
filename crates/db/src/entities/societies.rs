//! `SeaORM` Entity for societies table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::SocietyType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "societies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub society_type: SocietyType,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[sea_orm(column_type = "Decimal(Some((19, 0)))")]
    pub opening_balance: Decimal,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::society_users::Entity")]
    SocietyUsers,
}

impl Related<super::society_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SocietyUsers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
