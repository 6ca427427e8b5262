//! Liveness probe.
//!
//! Answers 200 even when the database is unreachable. `status` and
//! `database` in the body carry the difference.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    database: &'static str,
    version: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let (status, database) = match state.db.ping().await {
        Ok(()) => ("healthy", "up"),
        Err(err) => {
            warn!(error = %err, "Database ping failed");
            ("degraded", "unreachable")
        }
    };
    Json(Health {
        status,
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
