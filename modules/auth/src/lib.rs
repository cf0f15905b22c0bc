//! Multi-tenant authentication: tenant registry, cross-tenant credential
//! resolution, and token-based session management.
//!
//! Login handles are only unique within a tenant, so authentication scans
//! every routable tenant database in a stable order, verifies the secret
//! there, and issues tokens that carry the routing claims needed to validate
//! later requests without another control-plane lookup.

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;

#[cfg(test)]
pub(crate) mod testkit;

use std::sync::Arc;

use waybill_db::TenantDbManager;

pub use config::AuthConfig;

use domain::repo::{LoginAudit, PrincipalStore, TenantDirectory};
use domain::resolver::CredentialResolver;
use domain::session::SessionService;

/// Wire the sea-orm repositories to the domain services and return the REST
/// router.
#[must_use]
pub fn rest_router(manager: Arc<TenantDbManager>, cfg: &AuthConfig) -> axum::Router {
    let tenants: Arc<dyn TenantDirectory> =
        Arc::new(infra::storage::SeaOrmTenantDirectory::new(Arc::clone(&manager)));
    let store: Arc<dyn PrincipalStore> =
        Arc::new(infra::storage::SeaOrmPrincipalStore::new(Arc::clone(&manager)));
    let audit: Arc<dyn LoginAudit> = Arc::new(infra::storage::SeaOrmLoginAudit::new(manager));

    let resolver = CredentialResolver::new(Arc::clone(&tenants), Arc::clone(&store));
    let sessions = SessionService::new(tenants, store, audit, cfg);
    api::rest::router(Arc::new(api::rest::AuthState { resolver, sessions }))
}
