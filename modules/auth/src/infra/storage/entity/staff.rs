//! Per-tenant `staff` table.

use sea_orm::entity::prelude::*;

use crate::domain::model::{AccountStatus, StaffAccount};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub is_supervisor: bool,
    pub password_hash: String,
    pub status: String,
    pub online: bool,
    pub last_activity: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for StaffAccount {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            role: model.role,
            is_supervisor: model.is_supervisor,
            secret_hash: model.password_hash,
            status: AccountStatus::from_store(&model.status),
            online: model.online,
            last_activity: model.last_activity,
        }
    }
}
