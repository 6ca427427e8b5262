//! Dashboard figures and their per-society cache.

mod cache;
pub mod types;

pub use cache::DashboardCache;
pub use types::{DashboardFigures, DashboardSummary, RowFingerprint};
