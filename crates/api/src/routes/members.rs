//! Member assignment routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use society_core::auth::SocietyRole;
use society_db::MemberRepository;
use society_db::repositories::AssignMemberInput;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, require_role};
use crate::schemas;

/// Creates the members router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/societies/{society_id}/members",
            get(list_members).post(assign_member),
        )
        .route(
            "/societies/{society_id}/members/{member_id}",
            delete(unassign_member),
        )
}

/// POST /societies/{society_id}/members - Assign a user to a unit.
async fn assign_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<schemas::AssignMemberInput>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;
    let unit = payload.unit.to_unit()?;

    let member = MemberRepository::new((*state.db).clone())
        .assign(
            society_id,
            AssignMemberInput {
                user_id: payload.user_id,
                unit,
                move_in_date: payload.move_in_date,
            },
        )
        .await?;

    info!(society_id = %society_id, member_id = %member.id, "Member assigned");
    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /societies/{society_id}/members - List active members.
async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    Ok(Json(
        MemberRepository::new((*state.db).clone())
            .list_active(society_id)
            .await?,
    ))
}

/// DELETE /societies/{society_id}/members/{member_id} - Move a member out.
async fn unassign_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, member_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let member = MemberRepository::new((*state.db).clone())
        .unassign(society_id, member_id)
        .await?;

    Ok(Json(member))
}
