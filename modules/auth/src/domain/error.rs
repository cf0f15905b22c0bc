use waybill_db::DbError;

/// Domain errors for authentication flows.
///
/// Lookup misses and bad secrets both end up as [`AuthError::NotFound`] so
/// the boundary can answer with one uniform "invalid credentials" response
/// that does not reveal which tenant knows a name.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No principal matched, or the principal disappeared since the token
    /// was issued.
    #[error("{0}")]
    NotFound(String),

    /// The account exists but is suspended, disabled or locked.
    #[error("{0}")]
    AccountBlocked(String),

    /// The only matching accounts live in tenants that are not active.
    #[error("{0}")]
    TenantInactive(String),

    /// The token is malformed, expired, has a bad signature, or carries the
    /// wrong claims for the operation.
    #[error("invalid or malformed token")]
    InvalidToken,

    /// The session outlived the allowed inactivity window.
    #[error("session expired, log in again")]
    SessionExpired,

    /// The control plane no longer resolves the tenant to a usable store.
    /// Never downgraded to a default store.
    #[error("tenant {tenant_id} has no usable store configuration")]
    TenantMisconfigured { tenant_id: i64 },

    /// A store or connection failure outside the caller's control.
    #[error("infrastructure failure: {0}")]
    Infrastructure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
    pub fn infra<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Infrastructure(Box::new(err))
    }

    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Infrastructure(_))
    }
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        Self::infra(err)
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::infra(err)
    }
}
