//! Error responses.
//!
//! Every handler error becomes `{"error": code, "message": msg}` with the
//! status taken from [`AppError::status_code`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use society_shared::AppError;
use tracing::error;
use validator::ValidationErrors;

/// Handler error rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// The wrapped application error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.public_message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self(AppError::Validation(format!("Validation failed: {errors}")))
    }
}

macro_rules! impl_from_domain_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self(err.into())
                }
            }
        )+
    };
}

impl_from_domain_error!(
    society_core::allocation::AllocationError,
    society_core::auth::PasswordError,
    society_core::dues::DuesError,
    society_core::ledger::LedgerError,
    society_core::notice::NoticeError,
    society_core::payment::PaymentError,
    society_core::penalty::PenaltyError,
    society_core::period::PeriodError,
    society_core::poll::VoteError,
    society_db::repositories::DashboardError,
    society_db::repositories::DuesRepoError,
    society_db::repositories::LedgerRepoError,
    society_db::repositories::MaintenanceError,
    society_db::repositories::MemberError,
    society_db::repositories::NoticeRepoError,
    society_db::repositories::PaymentRepoError,
    society_db::repositories::PenaltyRepoError,
    society_db::repositories::PollRepoError,
    society_db::repositories::SocietyError,
    society_db::repositories::UnitError,
    society_db::repositories::UserError,
    society_shared::JwtError,
);

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_conflict_response() {
        let response = ApiError(AppError::Conflict("User has already voted".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"], "CONFLICT");
        assert_eq!(body["message"], "User has already voted");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let response = ApiError::from(DbErr::Custom("relation \"dues\" missing".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An error occurred");
    }
}
