use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a tenant in the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Active,
    Inactive,
    Pending,
    Suspended,
}

impl TenantStatus {
    /// Parse the status column. Unknown values are treated as [`Self::Pending`]
    /// so a half-provisioned tenant never authenticates.
    #[must_use]
    pub fn from_store(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "suspended" => Self::Suspended,
            _ => Self::Pending,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
            Self::Suspended => "suspended",
        }
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    /// User-facing reason a non-active tenant refuses logins.
    #[must_use]
    pub fn refusal_message(self) -> &'static str {
        match self {
            Self::Active => "",
            Self::Inactive => "your organization has been deactivated, contact support",
            Self::Pending => "your organization is awaiting activation",
            Self::Suspended => "your organization is suspended, contact support",
        }
    }
}

/// A tenant as listed in the control-plane store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub id: i64,
    pub name: String,
    pub display_name: Option<String>,
    /// Name of the tenant's own database. `None` for tenants that are not
    /// provisioned yet; those are never part of the login scan.
    pub store_locator: Option<String>,
    pub status: TenantStatus,
    pub logo_url: Option<String>,
}

impl Tenant {
    /// The tenant's database name. An empty string means the tenant was
    /// never provisioned and is treated the same as no locator at all.
    #[must_use]
    pub fn locator(&self) -> Option<&str> {
        self.store_locator.as_deref().filter(|l| !l.is_empty())
    }

    /// Display name with the technical name as fallback.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Lifecycle state of a staff or customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Suspended,
    Disabled,
}

impl AccountStatus {
    #[must_use]
    pub fn from_store(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "suspended" => Self::Suspended,
            _ => Self::Disabled,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Disabled => "disabled",
        }
    }
}

/// A staff member inside one tenant database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffAccount {
    pub id: i64,
    pub tenant_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub is_supervisor: bool,
    pub secret_hash: String,
    pub status: AccountStatus,
    pub online: bool,
    pub last_activity: Option<DateTime<Utc>>,
}

/// A customer account inside one tenant database. The primary email lives on
/// the customer's contact record, not on the account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerAccount {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub secret_hash: String,
    pub status: AccountStatus,
    pub locked: bool,
    pub online: bool,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Which account table a principal comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Staff,
    Customer,
}

impl PrincipalKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Customer => "customer",
        }
    }
}

/// An authenticated (or authenticating) account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Staff(StaffAccount),
    Customer(CustomerAccount),
}

impl Principal {
    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Staff(s) => s.id,
            Self::Customer(c) => c.id,
        }
    }

    #[must_use]
    pub fn tenant_id(&self) -> i64 {
        match self {
            Self::Staff(s) => s.tenant_id,
            Self::Customer(c) => c.tenant_id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Self::Staff(_) => PrincipalKind::Staff,
            Self::Customer(_) => PrincipalKind::Customer,
        }
    }

    /// The handle the principal logs in with.
    #[must_use]
    pub fn login_name(&self) -> &str {
        match self {
            Self::Staff(s) => &s.username,
            Self::Customer(c) => &c.name,
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Staff(s) => s.email.as_deref(),
            Self::Customer(c) => c.email.as_deref(),
        }
    }

    #[must_use]
    pub fn role(&self) -> String {
        match self {
            Self::Staff(s) => s.role.clone().unwrap_or_else(|| "staff".to_owned()),
            Self::Customer(_) => "customer".to_owned(),
        }
    }

    #[must_use]
    pub fn is_supervisor(&self) -> bool {
        match self {
            Self::Staff(s) => s.is_supervisor,
            Self::Customer(_) => false,
        }
    }

    #[must_use]
    pub fn secret_hash(&self) -> &str {
        match self {
            Self::Staff(s) => &s.secret_hash,
            Self::Customer(c) => &c.secret_hash,
        }
    }

    #[must_use]
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Staff(s) => s.last_activity,
            Self::Customer(c) => c.last_activity,
        }
    }

    /// Why this account must not authenticate, if any.
    #[must_use]
    pub fn blocked_reason(&self) -> Option<String> {
        match self {
            Self::Staff(s) => match s.status {
                AccountStatus::Active => None,
                AccountStatus::Suspended => {
                    Some("account suspended, contact your administrator".to_owned())
                }
                AccountStatus::Disabled => Some("account disabled".to_owned()),
            },
            Self::Customer(c) => {
                if c.locked {
                    return Some("account locked, contact your provider".to_owned());
                }
                match c.status {
                    AccountStatus::Active => None,
                    AccountStatus::Suspended => {
                        Some("account suspended, contact your provider".to_owned())
                    }
                    AccountStatus::Disabled => Some("account disabled".to_owned()),
                }
            }
        }
    }
}
