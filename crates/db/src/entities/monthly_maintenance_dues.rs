//! `SeaORM` Entity for monthly_maintenance_dues table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_maintenance_dues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    pub building_id: Option<Uuid>,
    pub flat_id: Option<Uuid>,
    pub housing_id: Option<Uuid>,
    pub member_ids: Vec<Uuid>,
    pub month_year: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 0)))")]
    pub maintenance_amount: Decimal,
    pub maintenance_paid: bool,
    pub maintenance_paid_at: Option<DateTimeWithTimeZone>,
    pub payment_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
