//! Penalty ledger.
//!
//! Penalties are charged against a flat or housing unit, paid at most once
//! and soft-deleted at most once. Deleted penalties stay retrievable by id
//! but never count towards totals.

mod error;
mod ledger;
mod types;

#[cfg(test)]
mod props;

pub use error::PenaltyError;
pub use ledger::{PenaltyLedger, validate_new_penalty};
pub use types::{DeletionState, Penalty};
