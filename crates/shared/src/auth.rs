//! Token claims and the login/registration payloads.
//!
//! Roles are re-read from `society_users` on every request, so `soc` and
//! `role` only tell the client which society to open first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    /// Default society, absent for users without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soc: Option<Uuid>,
    /// Role in `soc` at issue time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id`, optionally scoped to a `(society, role)` pair.
    #[must_use]
    pub fn new(user_id: Uuid, society: Option<(Uuid, &str)>, expires_at: DateTime<Utc>) -> Self {
        let (soc, role) = match society {
            Some((id, role)) => (Some(id), Some(role.to_owned())),
            None => (None, None),
        };
        Self {
            sub: user_id,
            soc,
            role,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Same as `sub`.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Same as `soc`.
    #[must_use]
    pub const fn society_id(&self) -> Option<Uuid> {
        self.soc
    }
}

/// `POST /auth/login` body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login email.
    #[validate(email, length(max = 255))]
    pub email: String,
    /// Plain-text password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    /// Contact number.
    #[serde(default)]
    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,
}

/// Returned by both auth endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// The signed-in user.
    pub user: UserInfo,
    /// Bearer token.
    pub access_token: String,
    /// Seconds until `access_token` expires.
    pub expires_in: u64,
}

/// The signed-in user.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// Id.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Every society the user has a role in.
    pub societies: Vec<UserSociety>,
}

/// A society the user belongs to, with their role there.
#[derive(Debug, Clone, Serialize)]
pub struct UserSociety {
    /// Id.
    pub id: Uuid,
    /// Society name.
    pub name: String,
    /// Role name.
    pub role: String,
}
