use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::resolver::CredentialResolver;
use crate::domain::session::SessionService;

use super::dto::{LoginRequest, MeResponse, RefreshRequest, SessionResponse};
use super::error::ApiError;
use super::extract::Bearer;

/// Shared state behind the auth routes.
pub struct AuthState {
    pub resolver: CredentialResolver,
    pub sessions: SessionService,
}

pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let resolved = state.resolver.resolve(&req.identifier, &req.password).await?;
    let issued = state.sessions.issue(&resolved.principal).await?;
    Ok(Json(SessionResponse::new(&resolved.principal, &issued)))
}

pub async fn refresh(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (issued, principal) = state.sessions.refresh(&req.refresh_token).await?;
    Ok(Json(SessionResponse::new(&principal, &issued)))
}

pub async fn logout(
    State(state): State<Arc<AuthState>>,
    Bearer(token): Bearer,
) -> Result<StatusCode, ApiError> {
    state.sessions.logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(
    State(state): State<Arc<AuthState>>,
    Bearer(token): Bearer,
) -> Result<Json<MeResponse>, ApiError> {
    let authed = state.sessions.validate(&token).await?;
    Ok(Json(MeResponse::from(&authed)))
}
