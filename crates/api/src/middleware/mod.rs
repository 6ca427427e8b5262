//! Request middleware and extractors.

pub mod access;
pub mod auth;

pub use access::require_role;
pub use auth::{AuthUser, auth_middleware};
