//! Poll routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use society_core::auth::SocietyRole;
use society_core::poll::validate_new_poll;
use society_db::PollRepository;
use society_db::entities::{poll_options, polls};
use society_db::repositories::CreatePollInput;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, require_role};
use crate::schemas::{self, VoteInput, validate_input};

/// Creates the polls router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/societies/{society_id}/polls",
            get(list_polls).post(create_poll),
        )
        .route("/societies/{society_id}/polls/{poll_id}", get(get_poll))
        .route(
            "/societies/{society_id}/polls/{poll_id}/vote",
            post(vote),
        )
        .route(
            "/societies/{society_id}/polls/{poll_id}/close",
            post(close_poll),
        )
}

#[derive(Debug, Serialize)]
struct PollWithOptions {
    #[serde(flatten)]
    poll: polls::Model,
    options: Vec<poll_options::Model>,
}

fn repo(state: &AppState) -> PollRepository {
    PollRepository::new((*state.db).clone())
}

/// POST /societies/{society_id}/polls - Create a poll with its options.
async fn create_poll(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<schemas::CreatePollInput>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let options = validate_new_poll(
        &payload.question,
        &payload.options,
        payload.expires_at,
        Utc::now(),
    )?;
    let (poll, options) = repo(&state)
        .create(
            society_id,
            CreatePollInput {
                question: payload.question.trim().to_string(),
                description: payload.description,
                options,
                expires_at: payload.expires_at,
                created_by: auth.user_id(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PollWithOptions { poll, options })))
}

/// GET /societies/{society_id}/polls - List polls, newest first.
async fn list_polls(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    Ok(Json(repo(&state).list(society_id).await?))
}

/// GET /societies/{society_id}/polls/{poll_id} - Get a poll with vote counts.
async fn get_poll(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, poll_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    Ok(Json(repo(&state).get_with_tally(society_id, poll_id).await?))
}

/// POST /societies/{society_id}/polls/{poll_id}/vote - Cast the caller's vote.
async fn vote(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, poll_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<VoteInput>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;

    let vote = repo(&state)
        .vote(society_id, poll_id, payload.option_id, auth.user_id())
        .await?;

    Ok((StatusCode::CREATED, Json(vote)))
}

/// POST /societies/{society_id}/polls/{poll_id}/close - Stop accepting votes.
async fn close_poll(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, poll_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;
    Ok(Json(repo(&state).close(society_id, poll_id).await?))
}
