//! `SeaORM` active enums mirroring the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "society_type")]
#[serde(rename_all = "snake_case")]
pub enum SocietyType {
    #[sea_orm(string_value = "housing")]
    Housing,
    #[sea_orm(string_value = "residential")]
    Residential,
    #[sea_orm(string_value = "commercial")]
    Commercial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "society_role")]
#[serde(rename_all = "snake_case")]
pub enum SocietyRole {
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "member")]
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "allocation_mode")]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    #[sea_orm(string_value = "settlement")]
    Settlement,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "halfyearly")]
    HalfYearly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ledger_kind")]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "income")]
    Income,
}

impl From<society_core::auth::SocietyRole> for SocietyRole {
    fn from(role: society_core::auth::SocietyRole) -> Self {
        match role {
            society_core::auth::SocietyRole::SuperAdmin => Self::SuperAdmin,
            society_core::auth::SocietyRole::Admin => Self::Admin,
            society_core::auth::SocietyRole::Member => Self::Member,
        }
    }
}

impl From<SocietyRole> for society_core::auth::SocietyRole {
    fn from(role: SocietyRole) -> Self {
        match role {
            SocietyRole::SuperAdmin => Self::SuperAdmin,
            SocietyRole::Admin => Self::Admin,
            SocietyRole::Member => Self::Member,
        }
    }
}

impl From<society_core::allocation::AllocationMode> for AllocationMode {
    fn from(mode: society_core::allocation::AllocationMode) -> Self {
        match mode {
            society_core::allocation::AllocationMode::Settlement => Self::Settlement,
            society_core::allocation::AllocationMode::Quarterly => Self::Quarterly,
            society_core::allocation::AllocationMode::HalfYearly => Self::HalfYearly,
            society_core::allocation::AllocationMode::Yearly => Self::Yearly,
        }
    }
}

impl From<AllocationMode> for society_core::allocation::AllocationMode {
    fn from(mode: AllocationMode) -> Self {
        match mode {
            AllocationMode::Settlement => Self::Settlement,
            AllocationMode::Quarterly => Self::Quarterly,
            AllocationMode::HalfYearly => Self::HalfYearly,
            AllocationMode::Yearly => Self::Yearly,
        }
    }
}

impl From<society_core::ledger::LedgerKind> for LedgerKind {
    fn from(kind: society_core::ledger::LedgerKind) -> Self {
        match kind {
            society_core::ledger::LedgerKind::Expense => Self::Expense,
            society_core::ledger::LedgerKind::Income => Self::Income,
        }
    }
}
