use serde::{Deserialize, Serialize};

use crate::domain::model::{Principal, PrincipalKind, Tenant};
use crate::domain::session::{AuthenticatedPrincipal, IssuedSession};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login handle, account name or contact email.
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct PrincipalDto {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub variant: PrincipalKind,
    pub is_supervisor: bool,
}

impl From<&Principal> for PrincipalDto {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id(),
            username: principal.login_name().to_owned(),
            email: principal.email().map(ToOwned::to_owned),
            role: principal.role(),
            variant: principal.kind(),
            is_supervisor: principal.is_supervisor(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TenantDto {
    pub id: i64,
    pub name: String,
    pub display_name: Option<String>,
    pub logo_url: Option<String>,
}

impl From<&Tenant> for TenantDto {
    fn from(tenant: &Tenant) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name.clone(),
            display_name: tenant.display_name.clone(),
            logo_url: tenant.logo_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub principal: PrincipalDto,
    pub tenant: TenantDto,
}

impl SessionResponse {
    #[must_use]
    pub fn new(principal: &Principal, issued: &IssuedSession) -> Self {
        Self {
            access_token: issued.access_token.clone(),
            refresh_token: issued.refresh_token.clone(),
            principal: principal.into(),
            tenant: (&issued.tenant).into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub principal: PrincipalDto,
    pub tenant_id: i64,
    pub tenant_name: String,
}

impl From<&AuthenticatedPrincipal> for MeResponse {
    fn from(authed: &AuthenticatedPrincipal) -> Self {
        Self {
            principal: (&authed.principal).into(),
            tenant_id: authed.claims.tenant_id,
            tenant_name: authed.claims.tenant_name.clone(),
        }
    }
}
