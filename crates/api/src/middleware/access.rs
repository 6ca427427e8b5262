//! Per-society role checks.
//!
//! Roles are read from storage on every request rather than trusted from
//! the token, so a revoked or changed role applies immediately.

use society_core::auth::SocietyRole;
use society_db::SocietyRepository;
use society_shared::AppError;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Ensures the user holds at least `required` in the society.
///
/// Returns the user's actual role.
///
/// # Errors
///
/// Returns `Forbidden` if the user is not part of the society or holds a
/// lower role.
pub async fn require_role(
    state: &AppState,
    society_id: Uuid,
    user_id: Uuid,
    required: SocietyRole,
) -> ApiResult<SocietyRole> {
    let role: Option<SocietyRole> = SocietyRepository::new((*state.db).clone())
        .get_role(society_id, user_id)
        .await?
        .map(Into::into);

    match role {
        Some(role) if role.satisfies(required) => Ok(role),
        Some(_) => Err(AppError::Forbidden(format!(
            "This action requires the {} role",
            required.as_str()
        ))
        .into()),
        None => Err(AppError::Forbidden("You are not a member of this society".to_string()).into()),
    }
}
