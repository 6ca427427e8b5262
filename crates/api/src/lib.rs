//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware and society role checks
//! - Request schemas with validation
//! - Error responses

pub mod error;
pub mod middleware;
pub mod routes;
pub mod schemas;

use axum::Router;
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use society_core::dashboard::DashboardCache;
use society_shared::JwtService;
use society_shared::config::PaymentConfig;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Per-society dashboard figures.
    pub dashboard_cache: Arc<DashboardCache>,
    /// Payment gateway settings.
    pub payment: Arc<PaymentConfig>,
    /// Timezone deciding the current billing month.
    pub dues_timezone: Tz,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
