//! Society routes: create, read, update, and per-society roles.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::Serialize;
use society_core::auth::SocietyRole;
use society_db::entities::societies;
use society_db::repositories::{CreateSocietyInput, UpdateSocietyInput};
use society_db::{SocietyRepository, UserRepository};
use society_shared::AppError;
use tracing::info;
use uuid::Uuid;

use super::invalidate_dashboard;
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, require_role};
use crate::schemas::{self, validate_input};

/// Creates the society router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/societies", get(list_my_societies).post(create_society))
        .route(
            "/societies/{society_id}",
            get(get_society).patch(update_society),
        )
        .route("/societies/{society_id}/users", get(list_society_users))
        .route("/societies/{society_id}/roles", put(set_role))
}

/// A society with the caller's role in it.
#[derive(Debug, Serialize)]
struct SocietyWithRole {
    #[serde(flatten)]
    society: societies::Model,
    role: SocietyRole,
}

/// A user listed with their role.
#[derive(Debug, Serialize)]
struct SocietyUser {
    id: Uuid,
    email: String,
    full_name: String,
    phone: Option<String>,
    role: SocietyRole,
}

/// GET /societies - List societies the caller belongs to.
async fn list_my_societies(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let societies: Vec<SocietyWithRole> = UserRepository::new((*state.db).clone())
        .get_user_societies(auth.user_id())
        .await?
        .into_iter()
        .map(|(society, role)| SocietyWithRole {
            society,
            role: role.into(),
        })
        .collect();

    Ok(Json(societies))
}

/// POST /societies - Create a society; the caller becomes its super admin.
async fn create_society(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<schemas::CreateSocietyInput>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;

    let society = SocietyRepository::new((*state.db).clone())
        .create_with_super_admin(
            CreateSocietyInput {
                name: payload.name,
                society_type: payload.society_type,
                address_line: payload.address_line,
                city: payload.city,
                state: payload.state,
                pincode: payload.pincode,
                opening_balance: payload.opening_balance,
            },
            auth.user_id(),
        )
        .await?;

    info!(society_id = %society.id, user_id = %auth.user_id(), "Society created");
    Ok((
        StatusCode::CREATED,
        Json(SocietyWithRole {
            society,
            role: SocietyRole::SuperAdmin,
        }),
    ))
}

/// GET /societies/{society_id} - Get a society the caller belongs to.
async fn get_society(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let role = require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    let society = SocietyRepository::new((*state.db).clone())
        .find_by_id(society_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Society {society_id} not found")))?;

    Ok(Json(SocietyWithRole { society, role }))
}

/// PATCH /societies/{society_id} - Update society details or opening balance.
async fn update_society(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<schemas::UpdateSocietyInput>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let balance_changed = payload.opening_balance.is_some();
    let society = SocietyRepository::new((*state.db).clone())
        .update(
            society_id,
            UpdateSocietyInput {
                name: payload.name,
                address_line: payload.address_line,
                city: payload.city,
                state: payload.state,
                pincode: payload.pincode,
                opening_balance: payload.opening_balance,
            },
        )
        .await?;

    if balance_changed {
        invalidate_dashboard(&state, society_id);
    }
    info!(society_id = %society_id, "Society updated");
    Ok(Json(society))
}

/// GET /societies/{society_id}/users - List users and their roles.
async fn list_society_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let users: Vec<SocietyUser> = SocietyRepository::new((*state.db).clone())
        .list_users(society_id)
        .await?
        .into_iter()
        .map(|(user, role)| SocietyUser {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            role: role.into(),
        })
        .collect();

    Ok(Json(users))
}

/// PUT /societies/{society_id}/roles - Grant or change a user's role.
async fn set_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<schemas::SetRoleInput>,
) -> ApiResult<impl IntoResponse> {
    let caller = require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;
    if payload.role.can_manage() && !caller.can_grant_roles() {
        return Err(AppError::Forbidden("Only a super admin can grant admin roles".to_string()).into());
    }
    if payload.user_id == auth.user_id() {
        return Err(AppError::Validation("You cannot change your own role".to_string()).into());
    }

    let membership = SocietyRepository::new((*state.db).clone())
        .set_role(society_id, payload.user_id, payload.role.into())
        .await?;

    info!(
        society_id = %society_id,
        user_id = %payload.user_id,
        role = %payload.role,
        "Society role set"
    );
    Ok(Json(membership))
}
