//! Monthly maintenance dues.
//!
//! This module provides:
//! - Unit references (flat or housing unit, never both)
//! - The pure planning step of monthly dues generation
//! - Maintenance rate validation

mod error;
mod planner;
mod types;

pub use error::DuesError;
pub use planner::{DuesPlanner, validate_maintenance_rate};
pub use types::{DueDraft, GenerationSummary, OccupiedUnit, UnitKind, UnitRef};
