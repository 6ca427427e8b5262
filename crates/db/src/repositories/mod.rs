//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Tenant-scoped writes that touch more than one row run inside an
//! [`SocietyTxn`](crate::rls::SocietyTxn) transaction.

pub mod dashboard;
pub mod dues;
pub mod ledger;
pub mod maintenance;
pub mod member;
pub mod notice;
pub mod payment;
pub mod penalty;
pub mod poll;
pub mod society;
pub mod units;
pub mod user;

pub use dashboard::{DashboardError, DashboardRepository};
pub use dues::{DuesFilter, DuesRepoError, DuesRepository};
pub use ledger::{LedgerFilter, LedgerRepoError, LedgerRepository};
pub use maintenance::{
    CreatePendingInput, MaintenanceError, MaintenanceRepository, PendingWithAllocations,
};
pub use member::{AssignMemberInput, MemberError, MemberRepository};
pub use notice::{NoticeRepoError, NoticeRepository};
pub use payment::{PaymentRepoError, PaymentRepository, TargetOutcome};
pub use penalty::{CreatePenaltyInput, PenaltyRepoError, PenaltyRepository};
pub use poll::{CreatePollInput, PollRepoError, PollRepository, PollWithTally};
pub use society::{CreateSocietyInput, SocietyError, SocietyRepository, UpdateSocietyInput};
pub use units::{
    CreateBuildingInput, CreateFlatInput, CreateHousingUnitInput, UnitError, UnitRepository,
};
pub use user::{CreateUserInput, UserError, UserRepository};

use sea_orm::{DbErr, SqlErr};

/// True if the error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
