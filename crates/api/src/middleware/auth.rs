//! Bearer token authentication.
//!
//! [`auth_middleware`] guards every route except health and the auth
//! endpoints. It stores the decoded [`Claims`] in the request extensions,
//! where the [`AuthUser`] extractor picks them up.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use society_shared::{AppError, Claims};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

fn missing_credentials() -> ApiError {
    AppError::Unauthorized("Authorization header with Bearer token is required".to_string()).into()
}

/// Pulls the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(missing_credentials)?;

    let (scheme, token) = value.split_once(' ').ok_or_else(missing_credentials)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(missing_credentials());
    }
    Ok(token)
}

/// Rejects requests without a valid access token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let token = bearer_token(request.headers())?;
        state.jwt_service.validate_token(token)?
    };
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Id of the user the token was issued to.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    fn headers(value: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        }
        headers
    }

    #[rstest]
    #[case("Bearer abc", "abc")]
    #[case("bearer abc", "abc")]
    #[case("BEARER  abc ", "abc")]
    fn test_bearer_token_accepted(#[case] value: &'static str, #[case] expected: &str) {
        let headers = headers(Some(value));
        assert_eq!(bearer_token(&headers).unwrap(), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic abc"))]
    #[case(Some("Bearer"))]
    #[case(Some("Bearer   "))]
    fn test_bearer_token_rejected(#[case] value: Option<&'static str>) {
        let err = bearer_token(&headers(value)).unwrap_err();
        assert!(matches!(err.inner(), AppError::Unauthorized(_)));
    }
}
