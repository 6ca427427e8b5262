//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{Currency, is_positive_whole_amount, is_whole_amount};
pub use pagination::{PageRequest, PageResponse};
