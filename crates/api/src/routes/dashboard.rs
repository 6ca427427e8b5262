//! Society dashboard.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use society_core::auth::SocietyRole;
use society_core::dashboard::DashboardSummary;
use society_db::DashboardRepository;
use society_shared::types::SocietyId;
use tracing::debug;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, require_role};

/// Creates the dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/societies/{society_id}/dashboard", get(get_dashboard))
}

/// GET /societies/{society_id}/dashboard - Final balance and totals.
async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;

    let repo = DashboardRepository::new((*state.db).clone());
    let key = SocietyId::from_uuid(society_id);
    // Counted before the figures, so a row inserted in between only forces a recompute.
    let rows = repo.fingerprint(society_id).await?;
    if let Some(summary) = state.dashboard_cache.get(key, rows) {
        debug!(society_id = %society_id, "Dashboard served from cache");
        return Ok(Json(DashboardSummary::clone(&summary)));
    }

    let figures = repo.figures(society_id).await?;
    let summary = DashboardSummary::from_figures(key, &figures, Utc::now());
    state.dashboard_cache.insert(summary.clone(), rows);

    Ok(Json(summary))
}
