//! Pending maintenance allocation.
//!
//! A lump arrears amount is spread over 1, 3, 6 or 12 calendar months.
//! Every split reconstructs the original amount exactly: each month gets
//! `floor(A / N)` and the last month of the list also carries `A mod N`.

mod error;
mod planner;
mod types;

#[cfg(test)]
mod props;

pub use error::AllocationError;
pub use planner::AllocationPlanner;
pub use types::{AllocationMode, PlannedAllocation};
