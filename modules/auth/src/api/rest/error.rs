use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::error::AuthError;

/// Domain error to HTTP mapping.
///
/// Lookup misses, bad secrets and malformed tokens all collapse into one
/// `invalid_credentials` answer so responses never reveal which tenant knows
/// a name. `session_expired` is separate so clients know to re-authenticate
/// rather than retry.
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            AuthError::NotFound(_) | AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "invalid credentials".to_owned(),
            ),
            AuthError::SessionExpired => (
                StatusCode::UNAUTHORIZED,
                "session_expired",
                self.0.to_string(),
            ),
            AuthError::AccountBlocked(reason) => {
                (StatusCode::FORBIDDEN, "account_blocked", reason.clone())
            }
            AuthError::TenantInactive(reason) => {
                (StatusCode::FORBIDDEN, "tenant_inactive", reason.clone())
            }
            AuthError::TenantMisconfigured { tenant_id } => {
                tracing::error!(tenant_id, "tenant has no usable store configuration");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "tenant_misconfigured",
                    "tenant is not configured correctly".to_owned(),
                )
            }
            AuthError::Infrastructure(source) => {
                tracing::error!(error = %source, "infrastructure failure");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "infrastructure",
                    "service temporarily unavailable".to_owned(),
                )
            }
        };
        (status, Json(json!({ "code": code, "message": message }))).into_response()
    }
}
