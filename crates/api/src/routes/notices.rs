//! Notice board routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::Utc;
use society_core::auth::SocietyRole;
use society_core::notice::validate_notice;
use society_db::NoticeRepository;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, require_role};
use crate::schemas::{CreateNoticeInput, validate_input};

/// Creates the notices router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/societies/{society_id}/notices",
            get(list_notices).post(create_notice),
        )
        .route(
            "/societies/{society_id}/notices/{notice_id}",
            delete(delete_notice),
        )
}

/// POST /societies/{society_id}/notices - Publish a notice.
async fn create_notice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<CreateNoticeInput>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let (title, body) = validate_notice(&payload.title, &payload.body, payload.expires_at, Utc::now())?;
    let notice = NoticeRepository::new((*state.db).clone())
        .create(society_id, title, body, payload.expires_at, auth.user_id())
        .await?;

    Ok((StatusCode::CREATED, Json(notice)))
}

/// GET /societies/{society_id}/notices - List notices that have not expired.
async fn list_notices(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    Ok(Json(
        NoticeRepository::new((*state.db).clone())
            .list_active(society_id, Utc::now())
            .await?,
    ))
}

/// DELETE /societies/{society_id}/notices/{notice_id} - Remove a notice.
async fn delete_notice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, notice_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;
    NoticeRepository::new((*state.db).clone())
        .delete(society_id, notice_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
