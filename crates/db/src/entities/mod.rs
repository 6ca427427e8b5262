//! `SeaORM` entity definitions.

pub mod prelude;

pub mod buildings;
pub mod flats;
pub mod housing_units;
pub mod ledger_entries;
pub mod maintenance_allocations;
pub mod members;
pub mod monthly_maintenance_dues;
pub mod notices;
pub mod payments;
pub mod penalties;
pub mod pending_maintenances;
pub mod poll_options;
pub mod poll_votes;
pub mod polls;
pub mod sea_orm_active_enums;
pub mod societies;
pub mod society_users;
pub mod users;
