pub mod entity;

mod login_audit_repo;
mod principal_repo;
mod tenant_repo;

pub use login_audit_repo::SeaOrmLoginAudit;
pub use principal_repo::SeaOrmPrincipalStore;
pub use tenant_repo::SeaOrmTenantDirectory;
