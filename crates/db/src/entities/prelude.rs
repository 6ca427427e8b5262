//! Entity prelude.

pub use super::buildings::Entity as Buildings;
pub use super::flats::Entity as Flats;
pub use super::housing_units::Entity as HousingUnits;
pub use super::ledger_entries::Entity as LedgerEntries;
pub use super::maintenance_allocations::Entity as MaintenanceAllocations;
pub use super::members::Entity as Members;
pub use super::monthly_maintenance_dues::Entity as MonthlyMaintenanceDues;
pub use super::notices::Entity as Notices;
pub use super::payments::Entity as Payments;
pub use super::penalties::Entity as Penalties;
pub use super::pending_maintenances::Entity as PendingMaintenances;
pub use super::poll_options::Entity as PollOptions;
pub use super::poll_votes::Entity as PollVotes;
pub use super::polls::Entity as Polls;
pub use super::societies::Entity as Societies;
pub use super::society_users::Entity as SocietyUsers;
pub use super::users::Entity as Users;
