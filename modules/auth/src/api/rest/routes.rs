use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use super::handlers::{self, AuthState};

/// The auth REST surface.
#[must_use]
pub fn router(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/refresh", post(handlers::refresh))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
        .with_state(state)
}
