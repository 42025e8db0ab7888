//! Wire types for the remote access API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use avisos_core::access::AccessWindow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Response of `POST /auth/register`, `POST /auth/login` and
/// `POST /auth/verify-email`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: AuthUser,
}

/// Acknowledgement body for the password-recovery endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// `access` object of `GET /user/access`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessBody {
    pub plan: String,
    pub access_until: String,
    pub has_access: bool,
    pub days_remaining: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessResponse {
    pub access: AccessBody,
}

/// Error body shape used by the API: `{ "error": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: String,
}

impl From<AccessBody> for AccessWindow {
    fn from(body: AccessBody) -> Self {
        let access_until = DateTime::parse_from_rfc3339(&body.access_until)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));

        AccessWindow {
            plan: body.plan,
            access_until,
            has_access: body.has_access,
            days_remaining: body.days_remaining,
        }
    }
}
