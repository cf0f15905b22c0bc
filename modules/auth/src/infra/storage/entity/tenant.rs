//! Control-plane `tenants` table.

use sea_orm::entity::prelude::*;

use crate::domain::model::{Tenant, TenantStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub display_name: Option<String>,
    /// Name of the tenant's own database; `NULL` until provisioning is done.
    pub database_name: Option<String>,
    pub status: String,
    pub logo_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tenant {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            display_name: model.display_name,
            store_locator: model.database_name,
            status: TenantStatus::from_store(&model.status),
            logo_url: model.logo_url,
        }
    }
}
