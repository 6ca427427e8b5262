//! API route definitions.

use axum::{Router, middleware};
use society_shared::types::SocietyId;
use uuid::Uuid;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod dashboard;
pub mod dues;
pub mod health;
pub mod ledger;
pub mod members;
pub mod notices;
pub mod payments;
pub mod penalties;
pub mod polls;
pub mod societies;
pub mod units;

/// Creates the public API router.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(auth::routes())
}

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(societies::routes())
        .merge(units::routes())
        .merge(members::routes())
        .merge(dues::routes())
        .merge(penalties::routes())
        .merge(ledger::routes())
        .merge(polls::routes())
        .merge(notices::routes())
        .merge(payments::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    api_routes().merge(protected_routes)
}

/// Drops cached dashboard figures after a write that changes them.
pub(crate) fn invalidate_dashboard(state: &AppState, society_id: Uuid) {
    state
        .dashboard_cache
        .invalidate(SocietyId::from_uuid(society_id));
}

#[cfg(test)]
mod tests;
