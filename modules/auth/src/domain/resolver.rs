use std::sync::Arc;

use super::error::AuthError;
use super::model::{Principal, Tenant};
use super::repo::{PrincipalStore, TenantDirectory};

/// A successful credential lookup: the principal plus the tenant it lives in,
/// with the tenant read fresh from the control plane.
#[derive(Debug, Clone)]
pub struct ResolvedLogin {
    pub principal: Principal,
    pub tenant: Tenant,
}

/// What scanning one tenant produced.
enum TenantScan {
    /// Password match inside an active tenant.
    Match(Box<ResolvedLogin>),
    /// Password match, but the tenant is not active. The error is held back
    /// until the whole scan is done so a later active-tenant match wins.
    MatchInInactive(AuthError),
    /// Nothing matched here.
    Miss,
}

/// Finds which tenant an identifier/secret pair belongs to.
///
/// Login handles are only unique within a tenant, so the resolver walks every
/// routable tenant in id order and verifies the secret in each. The scan is
/// read-only; presence and audit writes happen at session issue time.
pub struct CredentialResolver {
    tenants: Arc<dyn TenantDirectory>,
    store: Arc<dyn PrincipalStore>,
}

impl CredentialResolver {
    #[must_use]
    pub fn new(tenants: Arc<dyn TenantDirectory>, store: Arc<dyn PrincipalStore>) -> Self {
        Self { tenants, store }
    }

    /// Scan all routable tenants for an account matching the identifier and
    /// secret.
    ///
    /// Staff accounts are checked before customer accounts within each
    /// tenant. A tenant whose store is unreachable is skipped with a
    /// warning. A match inside a non-active tenant is remembered and only
    /// reported if no active tenant matches by the end of the scan.
    ///
    /// # Errors
    /// - [`AuthError::AccountBlocked`] as soon as a matching account turns
    ///   out to be suspended, disabled or locked.
    /// - [`AuthError::TenantInactive`] after the scan, when the only matches
    ///   were in non-active tenants.
    /// - [`AuthError::NotFound`] when nothing matched anywhere.
    /// - [`AuthError::Infrastructure`] when the control plane itself is
    ///   unreachable.
    pub async fn resolve(&self, identifier: &str, secret: &str) -> Result<ResolvedLogin, AuthError> {
        let tenants = self.tenants.list_routable().await?;
        tracing::debug!(tenants = tenants.len(), "starting credential scan");

        let mut deferred_inactive: Option<AuthError> = None;
        for tenant in &tenants {
            let Some(locator) = tenant.locator() else {
                continue;
            };
            match self.scan_tenant(tenant, locator, identifier, secret).await {
                Ok(TenantScan::Match(resolved)) => return Ok(*resolved),
                Ok(TenantScan::MatchInInactive(err)) => {
                    tracing::debug!(
                        tenant = %tenant.name,
                        "match found in non-active tenant, continuing scan"
                    );
                    deferred_inactive.get_or_insert(err);
                }
                Ok(TenantScan::Miss) => {}
                Err(err) if err.is_infrastructure() => {
                    tracing::warn!(
                        tenant = %tenant.name,
                        error = %err,
                        "tenant store unreachable, skipping"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        match deferred_inactive {
            Some(err) => Err(err),
            None => Err(AuthError::NotFound(
                "no account matches the supplied credentials".to_owned(),
            )),
        }
    }

    async fn scan_tenant(
        &self,
        tenant: &Tenant,
        locator: &str,
        identifier: &str,
        secret: &str,
    ) -> Result<TenantScan, AuthError> {
        if let Some(staff) = self.store.find_staff_by_identifier(locator, identifier).await? {
            if verify_secret(secret, &staff.secret_hash) {
                return self.admit(Principal::Staff(staff), tenant).await;
            }
        }

        for customer in self
            .store
            .find_customers_by_identifier(locator, identifier)
            .await?
        {
            if verify_secret(secret, &customer.secret_hash) {
                return self.admit(Principal::Customer(customer), tenant).await;
            }
        }

        Ok(TenantScan::Miss)
    }

    /// Decide what a password match means, re-reading the tenant so a status
    /// change during the scan is honored.
    async fn admit(&self, principal: Principal, tenant: &Tenant) -> Result<TenantScan, AuthError> {
        let Some(fresh) = self.tenants.find(tenant.id).await? else {
            tracing::warn!(tenant_id = tenant.id, "tenant disappeared during scan");
            return Ok(TenantScan::Miss);
        };
        if !fresh.status.is_active() {
            return Ok(TenantScan::MatchInInactive(AuthError::TenantInactive(
                fresh.status.refusal_message().to_owned(),
            )));
        }
        if let Some(reason) = principal.blocked_reason() {
            return Err(AuthError::AccountBlocked(reason));
        }
        Ok(TenantScan::Match(Box::new(ResolvedLogin {
            principal,
            tenant: fresh,
        })))
    }
}

fn verify_secret(secret: &str, hash: &str) -> bool {
    match bcrypt::verify(secret, hash) {
        Ok(true) => true,
        Ok(false) => {
            tracing::debug!("secret mismatch, continuing scan");
            false
        }
        Err(err) => {
            tracing::debug!(error = %err, "unverifiable secret hash, treating as mismatch");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PrincipalKind, TenantStatus};
    use crate::testkit::{MockDirectory, MockStore, customer, staff, tenant};

    fn resolver(dir: Arc<MockDirectory>, store: Arc<MockStore>) -> CredentialResolver {
        CredentialResolver::new(dir, store)
    }

    #[tokio::test]
    async fn finds_staff_in_second_tenant() {
        let dir = Arc::new(MockDirectory::with_tenants(vec![
            tenant(1, "acme", Some("acme_db"), TenantStatus::Active),
            tenant(2, "zenco", Some("zenco_db"), TenantStatus::Active),
        ]));
        let store = Arc::new(MockStore::default());
        store.add_staff("zenco_db", staff(7, 2, "bob", "hunter2"));

        let resolved = resolver(dir, store)
            .resolve("bob", "hunter2")
            .await
            .unwrap();
        assert_eq!(resolved.tenant.id, 2);
        assert_eq!(resolved.principal.id(), 7);
        assert_eq!(resolved.principal.kind(), PrincipalKind::Staff);
    }

    #[tokio::test]
    async fn colliding_handles_prefer_the_matching_secret() {
        // Two tenants both know "bob"; only the second password matches.
        let dir = Arc::new(MockDirectory::with_tenants(vec![
            tenant(1, "acme", Some("acme_db"), TenantStatus::Active),
            tenant(2, "zenco", Some("zenco_db"), TenantStatus::Active),
        ]));
        let store = Arc::new(MockStore::default());
        store.add_staff("acme_db", staff(1, 1, "bob", "acme-pass"));
        store.add_staff("zenco_db", staff(2, 2, "bob", "zenco-pass"));

        let resolved = resolver(dir, store)
            .resolve("bob", "zenco-pass")
            .await
            .unwrap();
        assert_eq!(resolved.tenant.id, 2);
    }

    #[tokio::test]
    async fn active_match_beats_earlier_inactive_match() {
        let dir = Arc::new(MockDirectory::with_tenants(vec![
            tenant(1, "acme", Some("acme_db"), TenantStatus::Suspended),
            tenant(2, "zenco", Some("zenco_db"), TenantStatus::Active),
        ]));
        let store = Arc::new(MockStore::default());
        store.add_staff("acme_db", staff(1, 1, "bob", "hunter2"));
        store.add_staff("zenco_db", staff(2, 2, "bob", "hunter2"));

        let resolved = resolver(dir, store)
            .resolve("bob", "hunter2")
            .await
            .unwrap();
        assert_eq!(resolved.tenant.id, 2);
    }

    #[tokio::test]
    async fn inactive_match_is_reported_only_after_full_scan() {
        let dir = Arc::new(MockDirectory::with_tenants(vec![
            tenant(1, "acme", Some("acme_db"), TenantStatus::Inactive),
            tenant(2, "zenco", Some("zenco_db"), TenantStatus::Active),
        ]));
        let store = Arc::new(MockStore::default());
        store.add_staff("acme_db", staff(1, 1, "bob", "hunter2"));

        let err = resolver(dir, store)
            .resolve("bob", "hunter2")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TenantInactive(_)));
    }

    #[tokio::test]
    async fn wrong_secret_everywhere_is_not_found() {
        let dir = Arc::new(MockDirectory::with_tenants(vec![tenant(
            1,
            "acme",
            Some("acme_db"),
            TenantStatus::Active,
        )]));
        let store = Arc::new(MockStore::default());
        store.add_staff("acme_db", staff(1, 1, "bob", "hunter2"));

        let err = resolver(dir, store)
            .resolve("bob", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
    }

    #[tokio::test]
    async fn blocked_account_fails_immediately() {
        let dir = Arc::new(MockDirectory::with_tenants(vec![
            tenant(1, "acme", Some("acme_db"), TenantStatus::Active),
            tenant(2, "zenco", Some("zenco_db"), TenantStatus::Active),
        ]));
        let store = Arc::new(MockStore::default());
        let mut blocked = staff(1, 1, "bob", "hunter2");
        blocked.status = crate::domain::model::AccountStatus::Suspended;
        store.add_staff("acme_db", blocked);
        // A later tenant also matches, but the blocked account pre-empts it.
        store.add_staff("zenco_db", staff(2, 2, "bob", "hunter2"));

        let err = resolver(dir, store)
            .resolve("bob", "hunter2")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountBlocked(_)));
    }

    #[tokio::test]
    async fn unreachable_tenant_is_skipped() {
        let dir = Arc::new(MockDirectory::with_tenants(vec![
            tenant(1, "acme", Some("acme_db"), TenantStatus::Active),
            tenant(2, "zenco", Some("zenco_db"), TenantStatus::Active),
        ]));
        let store = Arc::new(MockStore::default());
        store.break_locator("acme_db");
        store.add_staff("zenco_db", staff(2, 2, "bob", "hunter2"));

        let resolved = resolver(dir, store)
            .resolve("bob", "hunter2")
            .await
            .unwrap();
        assert_eq!(resolved.tenant.id, 2);
    }

    #[tokio::test]
    async fn customer_matches_by_contact_email() {
        let dir = Arc::new(MockDirectory::with_tenants(vec![tenant(
            1,
            "acme",
            Some("acme_db"),
            TenantStatus::Active,
        )]));
        let store = Arc::new(MockStore::default());
        let mut account = customer(3, 1, "Freight Co", "hunter2");
        account.email = Some("ops@freight.test".to_owned());
        store.add_customer("acme_db", account);

        let resolved = resolver(dir, store)
            .resolve("ops@freight.test", "hunter2")
            .await
            .unwrap();
        assert_eq!(resolved.principal.kind(), PrincipalKind::Customer);
    }

    #[tokio::test]
    async fn staff_wins_over_customer_in_same_tenant() {
        let dir = Arc::new(MockDirectory::with_tenants(vec![tenant(
            1,
            "acme",
            Some("acme_db"),
            TenantStatus::Active,
        )]));
        let store = Arc::new(MockStore::default());
        store.add_staff("acme_db", staff(1, 1, "bob", "hunter2"));
        store.add_customer("acme_db", customer(2, 1, "bob", "hunter2"));

        let resolved = resolver(dir, store)
            .resolve("bob", "hunter2")
            .await
            .unwrap();
        assert_eq!(resolved.principal.kind(), PrincipalKind::Staff);
    }

    #[tokio::test]
    async fn status_change_during_scan_is_honored() {
        // The tenant is active in the scan list but suspended on the fresh
        // re-read that happens after the password match.
        let dir = Arc::new(MockDirectory::with_tenants(vec![tenant(
            1,
            "acme",
            Some("acme_db"),
            TenantStatus::Active,
        )]));
        let store = Arc::new(MockStore::default());
        store.add_staff("acme_db", staff(1, 1, "bob", "hunter2"));
        dir.set_status(1, TenantStatus::Suspended);

        let err = resolver(dir, store)
            .resolve("bob", "hunter2")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TenantInactive(_)));
    }
}
