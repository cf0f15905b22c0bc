use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::domain::error::AuthError;

use super::error::ApiError;

/// Extracts the bearer token from the `Authorization` header.
pub struct Bearer(pub String);

impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError(AuthError::InvalidToken))?;
        if token.is_empty() {
            return Err(ApiError(AuthError::InvalidToken));
        }
        Ok(Self(token.to_owned()))
    }
}
