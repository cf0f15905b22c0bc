//! In-memory fakes for the domain repository traits, used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::error::AuthError;
use crate::domain::model::{
    AccountStatus, CustomerAccount, Principal, PrincipalKind, StaffAccount, Tenant, TenantStatus,
};
use crate::domain::repo::{LoginAudit, PrincipalStore, TenantDirectory};

// Low cost keeps the test suite fast.
const TEST_BCRYPT_COST: u32 = 4;

pub fn tenant(id: i64, name: &str, locator: Option<&str>, status: TenantStatus) -> Tenant {
    Tenant {
        id,
        name: name.to_owned(),
        display_name: None,
        store_locator: locator.map(ToOwned::to_owned),
        status,
        logo_url: None,
    }
}

pub fn staff(id: i64, tenant_id: i64, username: &str, password: &str) -> StaffAccount {
    StaffAccount {
        id,
        tenant_id,
        username: username.to_owned(),
        email: Some(format!("{username}@example.test")),
        first_name: None,
        last_name: None,
        role: Some("dispatcher".to_owned()),
        is_supervisor: false,
        secret_hash: bcrypt::hash(password, TEST_BCRYPT_COST).unwrap(),
        status: AccountStatus::Active,
        online: false,
        last_activity: None,
    }
}

pub fn customer(id: i64, tenant_id: i64, name: &str, password: &str) -> CustomerAccount {
    CustomerAccount {
        id,
        tenant_id,
        name: name.to_owned(),
        contact_person: None,
        email: None,
        secret_hash: bcrypt::hash(password, TEST_BCRYPT_COST).unwrap(),
        status: AccountStatus::Active,
        locked: false,
        online: false,
        last_activity: None,
    }
}

/// Control-plane fake. `set_status` only affects `find`, which lets tests
/// simulate a status change between the scan listing and the fresh re-read.
#[derive(Default)]
pub struct MockDirectory {
    tenants: Mutex<Vec<Tenant>>,
    find_overrides: Mutex<HashMap<i64, TenantStatus>>,
}

impl MockDirectory {
    pub fn with_tenants(tenants: Vec<Tenant>) -> Self {
        Self {
            tenants: Mutex::new(tenants),
            find_overrides: Mutex::new(HashMap::new()),
        }
    }

    pub fn remove(&self, id: i64) {
        self.tenants.lock().unwrap().retain(|t| t.id != id);
    }

    pub fn set_status(&self, id: i64, status: TenantStatus) {
        self.find_overrides.lock().unwrap().insert(id, status);
    }
}

#[async_trait]
impl TenantDirectory for MockDirectory {
    async fn list_routable(&self) -> Result<Vec<Tenant>, AuthError> {
        let mut routable: Vec<Tenant> = self
            .tenants
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.store_locator.is_some())
            .cloned()
            .collect();
        routable.sort_by_key(|t| t.id);
        Ok(routable)
    }

    async fn find(&self, id: i64) -> Result<Option<Tenant>, AuthError> {
        let mut found = self
            .tenants
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned();
        if let Some(tenant) = found.as_mut() {
            if let Some(status) = self.find_overrides.lock().unwrap().get(&id) {
                tenant.status = *status;
            }
        }
        Ok(found)
    }
}

/// Per-tenant account store fake, keyed by store locator.
#[derive(Default)]
pub struct MockStore {
    staff: Mutex<HashMap<String, Vec<StaffAccount>>>,
    customers: Mutex<HashMap<String, Vec<CustomerAccount>>>,
    broken: Mutex<HashSet<String>>,
}

impl MockStore {
    pub fn add_staff(&self, locator: &str, account: StaffAccount) {
        self.staff
            .lock()
            .unwrap()
            .entry(locator.to_owned())
            .or_default()
            .push(account);
    }

    pub fn add_customer(&self, locator: &str, account: CustomerAccount) {
        self.customers
            .lock()
            .unwrap()
            .entry(locator.to_owned())
            .or_default()
            .push(account);
    }

    /// Make every call for this locator fail with an infrastructure error.
    pub fn break_locator(&self, locator: &str) {
        self.broken.lock().unwrap().insert(locator.to_owned());
    }

    pub fn staff_by_id(&self, locator: &str, id: i64) -> Option<StaffAccount> {
        self.staff
            .lock()
            .unwrap()
            .get(locator)
            .and_then(|list| list.iter().find(|s| s.id == id).cloned())
    }

    fn check(&self, locator: &str) -> Result<(), AuthError> {
        if self.broken.lock().unwrap().contains(locator) {
            return Err(AuthError::infra(std::io::Error::other(
                "store unreachable",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PrincipalStore for MockStore {
    async fn find_staff_by_identifier(
        &self,
        locator: &str,
        identifier: &str,
    ) -> Result<Option<StaffAccount>, AuthError> {
        self.check(locator)?;
        let needle = identifier.to_lowercase();
        Ok(self.staff.lock().unwrap().get(locator).and_then(|list| {
            list.iter()
                .find(|s| {
                    s.username.to_lowercase() == needle
                        || s.email.as_deref().is_some_and(|e| e.to_lowercase() == needle)
                })
                .cloned()
        }))
    }

    async fn find_customers_by_identifier(
        &self,
        locator: &str,
        identifier: &str,
    ) -> Result<Vec<CustomerAccount>, AuthError> {
        self.check(locator)?;
        let needle = identifier.to_lowercase();
        Ok(self
            .customers
            .lock()
            .unwrap()
            .get(locator)
            .map(|list| {
                list.iter()
                    .filter(|c| {
                        c.name.to_lowercase() == needle
                            || c.contact_person
                                .as_deref()
                                .is_some_and(|p| p.to_lowercase() == needle)
                            || c.email.as_deref().is_some_and(|e| e.to_lowercase() == needle)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_staff_by_id(
        &self,
        locator: &str,
        id: i64,
    ) -> Result<Option<StaffAccount>, AuthError> {
        self.check(locator)?;
        Ok(self.staff_by_id(locator, id))
    }

    async fn find_customer_by_id(
        &self,
        locator: &str,
        id: i64,
    ) -> Result<Option<CustomerAccount>, AuthError> {
        self.check(locator)?;
        Ok(self
            .customers
            .lock()
            .unwrap()
            .get(locator)
            .and_then(|list| list.iter().find(|c| c.id == id).cloned()))
    }

    async fn set_presence(
        &self,
        locator: &str,
        kind: PrincipalKind,
        id: i64,
        online: bool,
    ) -> Result<(), AuthError> {
        self.check(locator)?;
        match kind {
            PrincipalKind::Staff => {
                if let Some(list) = self.staff.lock().unwrap().get_mut(locator) {
                    for account in list.iter_mut().filter(|s| s.id == id) {
                        account.online = online;
                        if online {
                            account.last_activity = Some(Utc::now());
                        }
                    }
                }
            }
            PrincipalKind::Customer => {
                if let Some(list) = self.customers.lock().unwrap().get_mut(locator) {
                    for account in list.iter_mut().filter(|c| c.id == id) {
                        account.online = online;
                        if online {
                            account.last_activity = Some(Utc::now());
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn touch_last_activity(
        &self,
        locator: &str,
        kind: PrincipalKind,
        id: i64,
    ) -> Result<(), AuthError> {
        self.check(locator)?;
        match kind {
            PrincipalKind::Staff => {
                if let Some(list) = self.staff.lock().unwrap().get_mut(locator) {
                    for account in list.iter_mut().filter(|s| s.id == id) {
                        account.last_activity = Some(Utc::now());
                    }
                }
            }
            PrincipalKind::Customer => {
                if let Some(list) = self.customers.lock().unwrap().get_mut(locator) {
                    for account in list.iter_mut().filter(|c| c.id == id) {
                        account.last_activity = Some(Utc::now());
                    }
                }
            }
        }
        Ok(())
    }
}

/// Login-history fake that can be told to fail once.
#[derive(Default)]
pub struct MockAudit {
    next_id: AtomicI64,
    opened: Mutex<Vec<(String, i64)>>,
    closed: Mutex<Vec<(String, i64)>>,
    fail_next: AtomicBool,
}

impl MockAudit {
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn opened_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn closed_count(&self) -> usize {
        self.closed.lock().unwrap().len()
    }
}

#[async_trait]
impl LoginAudit for MockAudit {
    async fn open_session(&self, locator: &str, principal: &Principal) -> Result<i64, AuthError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AuthError::infra(std::io::Error::other("audit down")));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.opened
            .lock()
            .unwrap()
            .push((locator.to_owned(), principal.id()));
        Ok(id)
    }

    async fn close_session(&self, locator: &str, session_id: i64) -> Result<(), AuthError> {
        self.closed
            .lock()
            .unwrap()
            .push((locator.to_owned(), session_id));
        Ok(())
    }
}
