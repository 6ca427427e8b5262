//! Calendar month handling for dues and allocations.

mod month;

pub use month::{MonthYear, PeriodError};
