use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use waybill_db::TenantDbManager;

use crate::domain::error::AuthError;
use crate::domain::model::Tenant;
use crate::domain::repo::TenantDirectory;

use super::entity::tenant;

/// Tenant registry over the control-plane database. Every call reads fresh.
pub struct SeaOrmTenantDirectory {
    manager: Arc<TenantDbManager>,
}

impl SeaOrmTenantDirectory {
    #[must_use]
    pub fn new(manager: Arc<TenantDbManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl TenantDirectory for SeaOrmTenantDirectory {
    async fn list_routable(&self) -> Result<Vec<Tenant>, AuthError> {
        let db = self.manager.control_plane().await?;
        let rows = tenant::Entity::find()
            .filter(tenant::Column::DatabaseName.is_not_null())
            .filter(tenant::Column::DatabaseName.ne(""))
            .order_by_asc(tenant::Column::Id)
            .all(db.sea())
            .await?;
        Ok(rows.into_iter().map(Tenant::from).collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Tenant>, AuthError> {
        let db = self.manager.control_plane().await?;
        Ok(tenant::Entity::find_by_id(id)
            .one(db.sea())
            .await?
            .map(Tenant::from))
    }
}
