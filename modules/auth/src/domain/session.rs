use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::config::AuthConfig;

use super::error::AuthError;
use super::model::{Principal, PrincipalKind, Tenant};
use super::repo::{LoginAudit, PrincipalStore, TenantDirectory};
use super::token::{Claims, TokenCodec, TokenKind};

/// A freshly minted token pair plus the tenant it routes to.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub tenant: Tenant,
}

/// Output of a successful validation: the re-fetched principal and the
/// claims the request authenticated with.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    pub principal: Principal,
    pub claims: Claims,
}

/// Issues, refreshes and validates sessions.
///
/// Token claims carry everything needed to route a request to its tenant
/// database, so validation does not touch the control plane. Issue and
/// refresh do consult it and refuse to proceed when the tenant cannot be
/// resolved to a store; there is no fallback database.
pub struct SessionService {
    tenants: Arc<dyn TenantDirectory>,
    store: Arc<dyn PrincipalStore>,
    audit: Arc<dyn LoginAudit>,
    codec: TokenCodec,
    access_ttl: Duration,
    refresh_ttl: Duration,
    max_session_duration: Duration,
    freshness_window: Duration,
}

impl SessionService {
    #[must_use]
    pub fn new(
        tenants: Arc<dyn TenantDirectory>,
        store: Arc<dyn PrincipalStore>,
        audit: Arc<dyn LoginAudit>,
        cfg: &AuthConfig,
    ) -> Self {
        Self {
            tenants,
            store,
            audit,
            codec: TokenCodec::new(&cfg.jwt_secret),
            access_ttl: cfg.access_ttl,
            refresh_ttl: cfg.refresh_ttl,
            max_session_duration: cfg.max_session_duration,
            freshness_window: cfg.freshness_window,
        }
    }

    /// Issue a token pair for an already-authenticated principal.
    ///
    /// The tenant is re-read from the control plane; a tenant that vanished
    /// or lost its store locator since the credential scan fails hard. The
    /// login-audit record and the presence update are best-effort and never
    /// block issuance.
    ///
    /// # Errors
    /// [`AuthError::TenantMisconfigured`] when the control plane cannot
    /// resolve the principal's tenant to a store,
    /// [`AuthError::TenantInactive`] when the tenant is not active.
    pub async fn issue(&self, principal: &Principal) -> Result<IssuedSession, AuthError> {
        let tenant_id = principal.tenant_id();
        let tenant = self
            .tenants
            .find(tenant_id)
            .await?
            .ok_or(AuthError::TenantMisconfigured { tenant_id })?;
        if !tenant.status.is_active() {
            return Err(AuthError::TenantInactive(
                tenant.status.refusal_message().to_owned(),
            ));
        }
        let locator = tenant
            .locator()
            .ok_or(AuthError::TenantMisconfigured { tenant_id })?
            .to_owned();

        let session_record_id = match self.audit.open_session(&locator, principal).await {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(error = %err, "could not open login audit record");
                None
            }
        };
        if let Err(err) = self
            .store
            .set_presence(&locator, principal.kind(), principal.id(), true)
            .await
        {
            tracing::warn!(error = %err, "presence update failed on login");
        }

        tracing::info!(
            principal = principal.id(),
            tenant = tenant_id,
            variant = principal.kind().as_str(),
            "session issued"
        );
        self.mint(principal, &tenant, &locator, session_record_id)
    }

    /// Validate an access token and return the live principal behind it.
    ///
    /// Routing uses the token's claims alone. The principal is re-fetched so
    /// blocks and deletions applied after issuance take effect; the session
    /// dies once `last_activity` is older than the configured maximum,
    /// unless the token itself was minted within the freshness window.
    /// Successful validation stamps `last_activity`.
    ///
    /// # Errors
    /// [`AuthError::InvalidToken`], [`AuthError::SessionExpired`],
    /// [`AuthError::AccountBlocked`], [`AuthError::NotFound`] or
    /// [`AuthError::Infrastructure`].
    pub async fn validate(&self, token: &str) -> Result<AuthenticatedPrincipal, AuthError> {
        let claims = self.codec.decode(token)?;
        if claims.token_use != TokenKind::Access || claims.store_locator.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let principal = self
            .fetch_principal(&claims.store_locator, claims.variant, claims.sub)
            .await?;
        if let Some(reason) = principal.blocked_reason() {
            return Err(AuthError::AccountBlocked(reason));
        }
        self.enforce_session_window(&claims, &principal).await?;

        if let Err(err) = self
            .store
            .touch_last_activity(&claims.store_locator, claims.variant, claims.sub)
            .await
        {
            tracing::warn!(error = %err, "last-activity update failed");
        }
        Ok(AuthenticatedPrincipal { principal, claims })
    }

    /// Trade a refresh token for a new pair.
    ///
    /// Unlike [`Self::validate`] this goes back to the control plane, so
    /// tenant deactivation and deprovisioning take effect at the next
    /// refresh at the latest.
    ///
    /// # Errors
    /// Same taxonomy as [`Self::issue`] plus [`AuthError::InvalidToken`]
    /// when the token is not a refresh token.
    pub async fn refresh(
        &self,
        refresh_token: &str,
    ) -> Result<(IssuedSession, Principal), AuthError> {
        let claims = self.codec.decode(refresh_token)?;
        if claims.token_use != TokenKind::Refresh {
            return Err(AuthError::InvalidToken);
        }

        let tenant_id = claims.tenant_id;
        let tenant = self
            .tenants
            .find(tenant_id)
            .await?
            .ok_or(AuthError::TenantMisconfigured { tenant_id })?;
        if !tenant.status.is_active() {
            return Err(AuthError::TenantInactive(
                tenant.status.refusal_message().to_owned(),
            ));
        }
        let locator = tenant
            .locator()
            .ok_or(AuthError::TenantMisconfigured { tenant_id })?
            .to_owned();

        let principal = self
            .fetch_principal(&locator, claims.variant, claims.sub)
            .await?;
        if let Some(reason) = principal.blocked_reason() {
            return Err(AuthError::AccountBlocked(reason));
        }

        if let Err(err) = self
            .store
            .set_presence(&locator, principal.kind(), principal.id(), true)
            .await
        {
            tracing::warn!(error = %err, "presence update failed on refresh");
        }

        let issued = self.mint(&principal, &tenant, &locator, claims.session_record_id)?;
        Ok((issued, principal))
    }

    /// Best-effort logout: mark the principal offline and close the audit
    /// record named by the token.
    ///
    /// # Errors
    /// [`AuthError::InvalidToken`] when the token does not verify;
    /// bookkeeping failures are only logged.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.codec.decode(token)?;
        if claims.token_use != TokenKind::Access {
            return Err(AuthError::InvalidToken);
        }

        if let Err(err) = self
            .store
            .set_presence(&claims.store_locator, claims.variant, claims.sub, false)
            .await
        {
            tracing::warn!(error = %err, "presence update failed on logout");
        }
        if let Some(session_id) = claims.session_record_id {
            if let Err(err) = self
                .audit
                .close_session(&claims.store_locator, session_id)
                .await
            {
                tracing::warn!(error = %err, "could not close login audit record");
            }
        }
        tracing::info!(principal = claims.sub, tenant = claims.tenant_id, "logged out");
        Ok(())
    }

    async fn fetch_principal(
        &self,
        locator: &str,
        kind: PrincipalKind,
        id: i64,
    ) -> Result<Principal, AuthError> {
        let found = match kind {
            PrincipalKind::Staff => self
                .store
                .find_staff_by_id(locator, id)
                .await?
                .map(Principal::Staff),
            PrincipalKind::Customer => self
                .store
                .find_customer_by_id(locator, id)
                .await?
                .map(Principal::Customer),
        };
        found.ok_or_else(|| AuthError::NotFound("account no longer exists".to_owned()))
    }

    async fn enforce_session_window(
        &self,
        claims: &Claims,
        principal: &Principal,
    ) -> Result<(), AuthError> {
        let Some(last_activity) = principal.last_activity() else {
            return Ok(());
        };
        let now = Utc::now();
        let elapsed = now.signed_duration_since(last_activity);
        if elapsed <= chrono::Duration::seconds(as_secs_i64(self.max_session_duration)) {
            return Ok(());
        }
        // A token minted moments ago proves a fresh login even when the
        // stored last_activity has not caught up yet.
        let token_age = now.timestamp() - claims.iat;
        if token_age < as_secs_i64(self.freshness_window) {
            return Ok(());
        }
        if let Err(err) = self
            .store
            .set_presence(&claims.store_locator, claims.variant, claims.sub, false)
            .await
        {
            tracing::warn!(error = %err, "presence update failed on expiry");
        }
        Err(AuthError::SessionExpired)
    }

    fn mint(
        &self,
        principal: &Principal,
        tenant: &Tenant,
        locator: &str,
        session_record_id: Option<i64>,
    ) -> Result<IssuedSession, AuthError> {
        let iat = Utc::now().timestamp();
        let access_claims = Claims {
            sub: principal.id(),
            username: principal.login_name().to_owned(),
            email: principal.email().map(ToOwned::to_owned),
            role: principal.role(),
            variant: principal.kind(),
            is_supervisor: principal.is_supervisor(),
            session_record_id,
            tenant_id: tenant.id,
            store_locator: locator.to_owned(),
            tenant_name: tenant.label().to_owned(),
            token_use: TokenKind::Access,
            iat,
            exp: iat.saturating_add(as_secs_i64(self.access_ttl)),
        };
        let access_token = self.codec.encode(&access_claims)?;

        let refresh_claims = Claims {
            token_use: TokenKind::Refresh,
            exp: iat.saturating_add(as_secs_i64(self.refresh_ttl)),
            ..access_claims
        };
        let refresh_token = self.codec.encode(&refresh_claims)?;

        Ok(IssuedSession {
            access_token,
            refresh_token,
            tenant: tenant.clone(),
        })
    }
}

fn as_secs_i64(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}
