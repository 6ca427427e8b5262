//! Penalty routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use society_core::auth::SocietyRole;
use society_core::lifecycle::TransitionOutcome;
use society_core::penalty::Penalty;
use society_db::PenaltyRepository;
use society_db::repositories::CreatePenaltyInput;
use society_shared::AppError;
use uuid::Uuid;

use super::invalidate_dashboard;
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, require_role};
use crate::schemas::{self, PenaltyQuery, validate_input};

/// Creates the penalties router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/societies/{society_id}/penalties",
            get(list_penalties).post(create_penalty),
        )
        .route(
            "/societies/{society_id}/penalties/{penalty_id}",
            get(get_penalty).delete(delete_penalty),
        )
        .route(
            "/societies/{society_id}/penalties/{penalty_id}/pay",
            post(pay_penalty),
        )
}

#[derive(Debug, Serialize)]
struct PaidPenalty {
    penalty: Penalty,
    outcome: TransitionOutcome,
}

fn repo(state: &AppState) -> PenaltyRepository {
    PenaltyRepository::new((*state.db).clone())
}

/// POST /societies/{society_id}/penalties - Charge a penalty to a unit.
async fn create_penalty(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<schemas::CreatePenaltyInput>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;
    let unit = payload.unit.to_unit()?;

    let penalty = repo(&state)
        .create(
            society_id,
            CreatePenaltyInput {
                unit,
                amount: payload.amount,
                reason: payload.reason,
                action_by: auth.user_id(),
            },
        )
        .await?;

    invalidate_dashboard(&state, society_id);
    Ok((StatusCode::CREATED, Json(penalty)))
}

/// GET /societies/{society_id}/penalties - List penalties.
async fn list_penalties(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Query(query): Query<PenaltyQuery>,
) -> ApiResult<impl IntoResponse> {
    let role = require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    let include_deleted = query.include_deleted && role.can_manage();
    Ok(Json(repo(&state).list(society_id, include_deleted).await?))
}

/// GET /societies/{society_id}/penalties/{penalty_id} - Get a penalty, deleted or not.
async fn get_penalty(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, penalty_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    let penalty = repo(&state)
        .find(society_id, penalty_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Penalty {penalty_id} not found")))?;

    Ok(Json(penalty))
}

/// POST /societies/{society_id}/penalties/{penalty_id}/pay - Mark a penalty paid.
async fn pay_penalty(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, penalty_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let (penalty, outcome) = repo(&state).mark_paid(society_id, penalty_id).await?;
    if outcome == TransitionOutcome::Applied {
        invalidate_dashboard(&state, society_id);
    }
    Ok(Json(PaidPenalty { penalty, outcome }))
}

/// DELETE /societies/{society_id}/penalties/{penalty_id} - Soft delete a penalty.
async fn delete_penalty(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, penalty_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let penalty = repo(&state)
        .mark_deleted(society_id, penalty_id, auth.user_id())
        .await?;

    invalidate_dashboard(&state, society_id);
    Ok(Json(penalty))
}
