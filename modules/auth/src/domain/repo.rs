use async_trait::async_trait;

use super::error::AuthError;
use super::model::{CustomerAccount, Principal, PrincipalKind, StaffAccount, Tenant};

/// Read access to the control-plane tenant registry.
///
/// Implementations read fresh on every call; tenant status is never cached
/// across requests.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Tenants that have a store locator, ordered by id ascending. The order
    /// is the contract: the login scan visits tenants in exactly this order.
    async fn list_routable(&self) -> Result<Vec<Tenant>, AuthError>;

    async fn find(&self, id: i64) -> Result<Option<Tenant>, AuthError>;
}

/// Access to the account tables inside one tenant database, addressed by the
/// tenant's store locator.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Staff account whose login handle or email matches, case-insensitive.
    async fn find_staff_by_identifier(
        &self,
        locator: &str,
        identifier: &str,
    ) -> Result<Option<StaffAccount>, AuthError>;

    /// Customer accounts whose name, contact person or contact email
    /// matches, case-insensitive. Several customers can share a contact
    /// email, so this returns all candidates.
    async fn find_customers_by_identifier(
        &self,
        locator: &str,
        identifier: &str,
    ) -> Result<Vec<CustomerAccount>, AuthError>;

    async fn find_staff_by_id(
        &self,
        locator: &str,
        id: i64,
    ) -> Result<Option<StaffAccount>, AuthError>;

    async fn find_customer_by_id(
        &self,
        locator: &str,
        id: i64,
    ) -> Result<Option<CustomerAccount>, AuthError>;

    /// Flip the online flag. Going online also stamps `last_activity`.
    async fn set_presence(
        &self,
        locator: &str,
        kind: PrincipalKind,
        id: i64,
        online: bool,
    ) -> Result<(), AuthError>;

    /// Stamp `last_activity` with the current time.
    async fn touch_last_activity(
        &self,
        locator: &str,
        kind: PrincipalKind,
        id: i64,
    ) -> Result<(), AuthError>;
}

/// Per-tenant login history. Callers treat every method as best-effort.
#[async_trait]
pub trait LoginAudit: Send + Sync {
    /// Record a login and return the new audit record id.
    async fn open_session(&self, locator: &str, principal: &Principal) -> Result<i64, AuthError>;

    async fn close_session(&self, locator: &str, session_id: i64) -> Result<(), AuthError>;
}
