//! Authentication routes for login and registration.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use society_core::auth::{hash_password, verify_password};
use society_db::UserRepository;
use society_db::entities::{sea_orm_active_enums::SocietyRole, societies, users};
use society_db::repositories::CreateUserInput;
use society_shared::AppError;
use society_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo, UserSociety};
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::schemas::validate_input;

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

fn invalid_credentials() -> ApiError {
    AppError::Unauthorized("Invalid email or password".to_string()).into()
}

/// POST /auth/login - Authenticate user and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;
    let user_repo = UserRepository::new((*state.db).clone());

    let Some(user) = user_repo.find_by_email(&payload.email).await? else {
        info!(email = %payload.email, "Login attempt for non-existent user");
        return Err(invalid_credentials());
    };

    if !user.is_active {
        return Err(AppError::Unauthorized("This account has been disabled".to_string()).into());
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    let societies = user_repo.get_user_societies(user.id).await?;
    let response = token_response(&state, user, societies)?;
    info!(user_id = %response.user.id, "User logged in successfully");

    Ok((StatusCode::OK, Json(response)))
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;

    let password_hash = hash_password(&payload.password)?;
    let user = UserRepository::new((*state.db).clone())
        .create(CreateUserInput {
            email: payload.email,
            password_hash,
            full_name: payload.full_name.trim().to_string(),
            phone: payload.phone,
        })
        .await?;

    info!(user_id = %user.id, "User registered");
    let response = token_response(&state, user, Vec::new())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Issues a token scoped to the user's first society, if any.
fn token_response(
    state: &AppState,
    user: users::Model,
    societies: Vec<(societies::Model, SocietyRole)>,
) -> ApiResult<LoginResponse> {
    let roles: Vec<society_core::auth::SocietyRole> =
        societies.iter().map(|(_, role)| (*role).into()).collect();
    let default_society = societies
        .first()
        .zip(roles.first())
        .map(|((society, _), role)| (society.id, role.as_str()));

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, default_society)?;

    Ok(LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            societies: societies
                .into_iter()
                .zip(roles)
                .map(|((society, _), role)| UserSociety {
                    id: society.id,
                    name: society.name,
                    role: role.as_str().to_string(),
                })
                .collect(),
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}
